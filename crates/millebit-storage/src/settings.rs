//! App settings persistence
//!
//! Currently a single entry: the biometric-enabled flag, stored as a JSON
//! boolean under the app's existing key.

use crate::kv::keys;
use crate::{KvStore, Result};

/// Persisted app settings.
#[derive(Clone)]
pub struct SettingsStore {
    kv: KvStore,
}

impl SettingsStore {
    /// Create a settings store over the shared key-value store.
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Whether biometric unlock is enabled. Defaults to false when unset.
    pub fn biometric_enabled(&self) -> Result<bool> {
        Ok(self.kv.get_json(keys::BIOMETRIC_ENABLED)?.unwrap_or(false))
    }

    /// Persist the biometric-enabled flag.
    pub fn set_biometric_enabled(&self, enabled: bool) -> Result<()> {
        self.kv.put_json(keys::BIOMETRIC_ENABLED, &enabled)?;
        tracing::debug!(enabled, "Biometric flag saved");
        Ok(())
    }

    /// Remove the biometric-enabled flag, reverting to the default.
    pub fn clear_biometric_state(&self) -> Result<()> {
        self.kv.delete(keys::BIOMETRIC_ENABLED)?;
        Ok(())
    }
}
