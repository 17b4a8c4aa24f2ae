//! Typed key-value access over the `kv` table
//!
//! This is the persistence surface the rest of the crate builds on. Keys
//! keep the namespace prefixes the mobile app already uses, so an existing
//! database migrates in place.

use crate::{Database, Error, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Persisted key names.
pub mod keys {
    /// JSON array of cards.
    pub const CARDS: &str = "@millibits_pay_cards";
    /// Plaintext username.
    pub const USERNAME: &str = "@millebits:username";
    /// Plaintext email.
    pub const EMAIL: &str = "@millebits:email";
    /// Plaintext password.
    pub const PASSWORD: &str = "@millebits:password";
    /// Plaintext access code.
    pub const ACCESS_CODE: &str = "@millebits:access_code";
    /// First-run marker: `"false"` once onboarding completed, absent before.
    pub const IS_FIRST_TIME: &str = "@millebits:is_first_time";
    /// JSON boolean biometric-enabled flag.
    pub const BIOMETRIC_ENABLED: &str = "@millibits_pay_biometric_enabled";
    /// JSON array of payment records.
    pub const TRANSACTIONS: &str = "@millibits_pay_transactions";
}

/// Key-value store over the shared database connection.
#[derive(Clone)]
pub struct KvStore {
    db: Database,
}

impl KvStore {
    /// Create a store over an open database.
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open a store at the given path.
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Open an in-memory store, for tests.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Read a raw value. Absence is `Ok(None)`.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let conn = self.db.lock();
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;
        Ok(value)
    }

    /// Write a raw value, replacing any previous one.
    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.db.lock();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        tracing::debug!(key, "kv put");
        Ok(())
    }

    /// Write several values in one transaction.
    pub fn put_raw_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [*key, *value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Delete a key. Returns whether a value existed.
    pub fn delete(&self, key: &str) -> Result<bool> {
        let conn = self.db.lock();
        let removed = conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }

    /// Delete several keys in one transaction.
    pub fn delete_many(&self, keys: &[&str]) -> Result<()> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        for key in keys {
            tx.execute("DELETE FROM kv WHERE key = ?1", [*key])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Read and decode a JSON value.
    ///
    /// Absence is `Ok(None)`; a value that fails to decode is
    /// [`Error::Corrupted`], never silently empty.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            None => Ok(None),
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    tracing::warn!(key, error = %e, "Corrupted stored value");
                    Err(Error::Corrupted {
                        key: key.to_string(),
                        reason: e.to_string(),
                    })
                }
            },
        }
    }

    /// Encode and write a JSON value.
    pub fn put_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put_raw(key, &raw)
    }

    /// Transactional read-modify-write of a single key.
    ///
    /// The closure receives the current value (if any) and returns the new
    /// value (`None` deletes the key) plus a result passed back to the
    /// caller. The whole cycle runs inside one SQLite transaction while the
    /// connection lock is held, so concurrent updates cannot lose writes.
    pub fn update<T, F>(&self, key: &str, f: F) -> Result<T>
    where
        F: FnOnce(Option<String>) -> Result<(Option<String>, T)>,
    {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;

        let current: Option<String> = tx
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(other),
            })?;

        let (next, out) = f(current)?;
        match next {
            Some(value) => {
                tx.execute(
                    "INSERT INTO kv (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    [key, value.as_str()],
                )?;
            }
            None => {
                tx.execute("DELETE FROM kv WHERE key = ?1", [key])?;
            }
        }
        tx.commit()?;

        Ok(out)
    }

    /// Remove every stored key. Used by the full data wipe.
    pub fn clear(&self) -> Result<()> {
        let conn = self.db.lock();
        conn.execute("DELETE FROM kv", [])?;
        tracing::debug!("kv cleared");
        Ok(())
    }
}
