//! Database connection and schema initialization

use crate::{Error, Result};
use parking_lot::{Mutex, MutexGuard};
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Current key-value schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Database handle. Cheap to clone; all clones share one connection behind
/// a mutex.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
        Self::init_schema(&conn)?;
        tracing::debug!("Opened database at {}", path.as_ref().display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS meta (
                name TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE name = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        match stored {
            None => {
                conn.execute(
                    "INSERT INTO meta (name, value) VALUES ('schema_version', ?1)",
                    [SCHEMA_VERSION.to_string()],
                )?;
            }
            Some(v) => {
                let version: u32 = v
                    .parse()
                    .map_err(|_| Error::Migration(format!("Unreadable schema version: {}", v)))?;
                if version > SCHEMA_VERSION {
                    return Err(Error::Migration(format!(
                        "Database schema version {} is newer than supported version {}",
                        version, SCHEMA_VERSION
                    )));
                }
                // No migration steps exist yet; older versions would be
                // upgraded here.
            }
        }

        Ok(())
    }

    /// Stored schema version.
    pub fn schema_version(&self) -> Result<u32> {
        let conn = self.lock();
        let v: String = conn.query_row(
            "SELECT value FROM meta WHERE name = 'schema_version'",
            [],
            |row| row.get(0),
        )?;
        v.parse()
            .map_err(|_| Error::Migration(format!("Unreadable schema version: {}", v)))
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}

/// Default on-disk location for the wallet database, under the platform's
/// per-user data directory.
pub fn default_database_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "millebit", "millebit-pay")
        .ok_or_else(|| Error::Storage("Cannot determine user data directory".to_string()))?;
    let dir = dirs.data_dir();
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::Storage(format!("Cannot create data directory: {}", e)))?;
    Ok(dir.join("millebit-pay.db"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_open_sets_schema_version() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_reopen_keeps_schema_version() {
        let file = NamedTempFile::new().unwrap();
        {
            let db = Database::open(file.path()).unwrap();
            assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
        }
        let db = Database::open(file.path()).unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_newer_schema_version_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        {
            let db = Database::open(file.path()).unwrap();
            let conn = db.lock();
            conn.execute(
                "UPDATE meta SET value = ?1 WHERE name = 'schema_version'",
                [(SCHEMA_VERSION + 1).to_string()],
            )
            .unwrap();
        }
        let result = Database::open(file.path());
        assert!(matches!(result, Err(Error::Migration(_))));
    }
}
