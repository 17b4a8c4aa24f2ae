//! Credential, access-code, and first-run persistence
//!
//! Values are stored as plaintext entries, matching what the mobile app
//! already writes. Verification mismatch is a boolean; only storage-layer
//! failures are errors, so a broken database is never reported to the user
//! as a wrong password.

use crate::kv::keys;
use crate::{Error, KvStore, Result};

/// Required access code length (digits).
pub const ACCESS_CODE_LEN: usize = 6;

/// Stored sign-in credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Display username.
    pub username: String,
    /// Sign-in identifier.
    pub email: String,
    /// Sign-in secret.
    pub password: String,
}

/// Persistence for credentials, the access code, and the first-run marker.
#[derive(Clone)]
pub struct CredentialStore {
    kv: KvStore,
}

impl CredentialStore {
    /// Create a credential store over the shared key-value store.
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Persist credentials and mark onboarding complete, in one transaction.
    pub fn set_credentials(&self, username: &str, email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(Error::Validation(
                "Email and password must not be empty".to_string(),
            ));
        }
        self.kv.put_raw_many(&[
            (keys::USERNAME, username),
            (keys::EMAIL, email),
            (keys::PASSWORD, password),
            (keys::IS_FIRST_TIME, "false"),
        ])?;
        tracing::info!("Credentials configured");
        Ok(())
    }

    /// Stored credentials, if both identifier and secret exist.
    pub fn credentials(&self) -> Result<Option<StoredCredentials>> {
        let email = self.kv.get_raw(keys::EMAIL)?;
        let password = self.kv.get_raw(keys::PASSWORD)?;
        match (email, password) {
            (Some(email), Some(password)) => {
                let username = self.kv.get_raw(keys::USERNAME)?.unwrap_or_default();
                Ok(Some(StoredCredentials {
                    username,
                    email,
                    password,
                }))
            }
            _ => Ok(None),
        }
    }

    /// Whether both a stored identifier and secret exist.
    pub fn has_credentials(&self) -> Result<bool> {
        Ok(self.credentials()?.is_some())
    }

    /// Compare against the stored credentials.
    ///
    /// `Ok(false)` for a mismatch or when nothing is stored; `Err` only for
    /// storage failures.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<bool> {
        match self.credentials()? {
            Some(stored) => Ok(stored.email == email && stored.password == password),
            None => Ok(false),
        }
    }

    /// Persist the access code and mark onboarding complete.
    ///
    /// The code must be exactly [`ACCESS_CODE_LEN`] ASCII digits.
    pub fn set_access_code(&self, code: &str) -> Result<()> {
        if code.len() != ACCESS_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(Error::Validation(format!(
                "Access code must be exactly {} digits",
                ACCESS_CODE_LEN
            )));
        }
        self.kv
            .put_raw_many(&[(keys::ACCESS_CODE, code), (keys::IS_FIRST_TIME, "false")])?;
        tracing::info!("Access code configured");
        Ok(())
    }

    /// Whether an access code is stored.
    pub fn has_access_code(&self) -> Result<bool> {
        Ok(self.kv.get_raw(keys::ACCESS_CODE)?.is_some())
    }

    /// Compare against the stored access code.
    pub fn verify_access_code(&self, code: &str) -> Result<bool> {
        match self.kv.get_raw(keys::ACCESS_CODE)? {
            Some(stored) => Ok(stored == code),
            None => Ok(false),
        }
    }

    /// Whether onboarding has never completed.
    ///
    /// True exactly when the first-run marker is absent.
    pub fn is_first_time(&self) -> Result<bool> {
        Ok(self.kv.get_raw(keys::IS_FIRST_TIME)?.is_none())
    }

    /// Remove credentials, access code, and the first-run marker.
    pub fn clear(&self) -> Result<()> {
        self.kv.delete_many(&[
            keys::USERNAME,
            keys::EMAIL,
            keys::PASSWORD,
            keys::ACCESS_CODE,
            keys::IS_FIRST_TIME,
        ])?;
        tracing::info!("Credentials cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> CredentialStore {
        CredentialStore::new(KvStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_credentials_roundtrip() {
        let creds = store();
        creds
            .set_credentials("millebit", "millebit@exemplo.com", "admin123")
            .unwrap();

        assert!(creds.has_credentials().unwrap());
        assert!(creds
            .verify_credentials("millebit@exemplo.com", "admin123")
            .unwrap());
        assert!(!creds
            .verify_credentials("millebit@exemplo.com", "wrong")
            .unwrap());
        assert!(!creds.verify_credentials("other@exemplo.com", "admin123").unwrap());
    }

    #[test]
    fn test_verify_with_nothing_stored_is_false() {
        let creds = store();
        assert!(!creds.verify_credentials("a@b.c", "pw").unwrap());
        assert!(!creds.verify_access_code("123456").unwrap());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let creds = store();
        assert!(matches!(
            creds.set_credentials("u", "", "pw"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            creds.set_credentials("u", "a@b.c", ""),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_access_code_roundtrip() {
        let creds = store();
        creds.set_access_code("123456").unwrap();

        assert!(creds.has_access_code().unwrap());
        assert!(creds.verify_access_code("123456").unwrap());
        assert!(!creds.verify_access_code("654321").unwrap());
    }

    #[test]
    fn test_access_code_must_be_six_digits() {
        let creds = store();
        assert!(matches!(
            creds.set_access_code("12345"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            creds.set_access_code("1234567"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            creds.set_access_code("12a456"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_first_time_flips_on_setup() {
        let creds = store();
        assert!(creds.is_first_time().unwrap());

        creds.set_access_code("123456").unwrap();
        assert!(!creds.is_first_time().unwrap());

        creds.clear().unwrap();
        assert!(creds.is_first_time().unwrap());
        assert!(!creds.has_access_code().unwrap());
    }

    #[test]
    fn test_set_credentials_marks_onboarded() {
        let creds = store();
        creds
            .set_credentials("millebit", "millebit@exemplo.com", "admin123")
            .unwrap();
        assert!(!creds.is_first_time().unwrap());
    }
}
