//! Biometric service: availability, guarded prompts, enablement toggle

use crate::{BiometricFailure, BiometricOutcome, PlatformBiometric, Result};
use millebit_storage::SettingsStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Default bound on how long a prompt may stay open.
///
/// The platform call has no timeout of its own; without this bound a hung
/// prompt would hold the in-flight guard forever.
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Capability checks and prompt orchestration over a platform adapter.
///
/// Cheap to clone; clones share the in-flight guard, so the one-prompt-at-
/// a-time rule holds across the whole process.
#[derive(Clone)]
pub struct BiometricService {
    adapter: Arc<dyn PlatformBiometric>,
    settings: SettingsStore,
    in_flight: Arc<AtomicBool>,
    timeout: Duration,
}

impl BiometricService {
    /// Create a service over a platform adapter and the settings store.
    pub fn new(adapter: Arc<dyn PlatformBiometric>, settings: SettingsStore) -> Self {
        Self {
            adapter,
            settings,
            in_flight: Arc::new(AtomicBool::new(false)),
            timeout: DEFAULT_PROMPT_TIMEOUT,
        }
    }

    /// Override the prompt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Hardware present and at least one credential enrolled.
    ///
    /// Any platform error reads as unavailable, not as a fault.
    pub async fn is_available(&self) -> bool {
        let has_hardware = match self.adapter.has_hardware().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Biometric hardware check failed");
                return false;
            }
        };
        if !has_hardware {
            return false;
        }
        match self.adapter.is_enrolled().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "Biometric enrollment check failed");
                false
            }
        }
    }

    /// Display names of the supported modalities. Errors read as empty.
    pub async fn biometric_types(&self) -> Vec<&'static str> {
        match self.adapter.supported_types().await {
            Ok(types) => types.iter().map(|t| t.display_name()).collect(),
            Err(e) => {
                tracing::warn!(error = %e, "Biometric type enumeration failed");
                Vec::new()
            }
        }
    }

    /// Run one platform challenge.
    ///
    /// Exactly one attempt may be in flight: a second concurrent call gets
    /// `Failed(InProgress)` immediately instead of queueing. The prompt is
    /// bounded by the configured timeout; expiry releases the guard and
    /// reports `Failed(TimedOut)`.
    pub async fn authenticate(&self, reason: &str) -> BiometricOutcome {
        if !self.is_available().await {
            return BiometricOutcome::Failed(BiometricFailure::NotAvailable);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return BiometricOutcome::Failed(BiometricFailure::InProgress);
        }

        let result = tokio::time::timeout(self.timeout, self.adapter.prompt(reason)).await;
        self.in_flight.store(false, Ordering::Release);

        match result {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "Biometric prompt timed out");
                BiometricOutcome::Failed(BiometricFailure::TimedOut)
            }
        }
    }

    /// Whether a prompt is currently in flight.
    pub fn is_authenticating(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Stored enablement flag. Defaults to false.
    pub fn is_enabled(&self) -> Result<bool> {
        Ok(self.settings.biometric_enabled()?)
    }

    /// Enable biometric unlock.
    ///
    /// The flag is persisted only after an availability check plus a
    /// successful prompt round-trip; the outcome is returned either way so
    /// the caller can explain a refusal.
    pub async fn enable(&self, reason: &str) -> Result<BiometricOutcome> {
        let outcome = self.authenticate(reason).await;
        if outcome.is_success() {
            self.settings.set_biometric_enabled(true)?;
            tracing::info!("Biometric unlock enabled");
        }
        Ok(outcome)
    }

    /// Disable biometric unlock. No prompt required.
    pub fn disable(&self) -> Result<()> {
        self.settings.set_biometric_enabled(false)?;
        tracing::info!("Biometric unlock disabled");
        Ok(())
    }
}

impl std::fmt::Debug for BiometricService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiometricService")
            .field("in_flight", &self.is_authenticating())
            .field("timeout", &self.timeout)
            .finish()
    }
}
