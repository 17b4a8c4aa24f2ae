//! Platform biometric abstraction
//!
//! The host app implements [`PlatformBiometric`] over the native API
//! (BiometricPrompt on Android, LocalAuthentication on iOS).
//! [`MockBiometric`] stands in for tests and for platforms without native
//! integration.

use crate::{BiometricFailure, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// Biometric modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiometricType {
    /// Fingerprint sensor.
    Fingerprint,
    /// Face recognition.
    Face,
    /// Iris scanner.
    Iris,
    /// Unspecified biometric.
    Generic,
}

impl BiometricType {
    /// Display name, for UI copy only. Does not affect logic.
    pub fn display_name(&self) -> &'static str {
        match self {
            BiometricType::Fingerprint => "Touch ID",
            BiometricType::Face => "Face ID",
            BiometricType::Iris => "Iris",
            BiometricType::Generic => "Biometric",
        }
    }
}

/// Tagged outcome of a biometric prompt. Never an `Err` past the adapter
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiometricOutcome {
    /// The prompt succeeded.
    Success {
        /// Modality that satisfied the prompt.
        biometric_type: BiometricType,
    },
    /// The prompt did not succeed.
    Failed(BiometricFailure),
}

impl BiometricOutcome {
    /// Whether the prompt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, BiometricOutcome::Success { .. })
    }
}

/// Bridge to the platform's biometric stack.
///
/// `prompt` may suspend for as long as the user interacts with the system
/// dialog; the service layer bounds it with a timeout and enforces one
/// attempt at a time.
#[async_trait]
pub trait PlatformBiometric: Send + Sync {
    /// Whether biometric hardware is present.
    async fn has_hardware(&self) -> Result<bool>;

    /// Whether at least one biometric credential is enrolled.
    async fn is_enrolled(&self) -> Result<bool>;

    /// Supported modalities, for display purposes.
    async fn supported_types(&self) -> Result<Vec<BiometricType>>;

    /// Show the platform challenge with the given reason string.
    async fn prompt(&self, reason: &str) -> BiometricOutcome;
}

/// Mock adapter for tests and platforms without native integration.
///
/// Outcomes are scripted: each call to `prompt` pops the next one, falling
/// back to success with the first configured modality.
pub struct MockBiometric {
    has_hardware: bool,
    enrolled: bool,
    types: Vec<BiometricType>,
    prompt_delay: Duration,
    scripted: Mutex<VecDeque<BiometricOutcome>>,
}

impl MockBiometric {
    /// A mock with fingerprint hardware enrolled and instant prompts.
    pub fn new() -> Self {
        Self {
            has_hardware: true,
            enrolled: true,
            types: vec![BiometricType::Fingerprint],
            prompt_delay: Duration::ZERO,
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// A mock with no biometric hardware at all.
    pub fn unavailable() -> Self {
        Self {
            has_hardware: false,
            enrolled: false,
            types: Vec::new(),
            prompt_delay: Duration::ZERO,
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    /// Override the supported modalities.
    pub fn with_types(mut self, types: Vec<BiometricType>) -> Self {
        self.types = types;
        self
    }

    /// Mark hardware present but nothing enrolled.
    pub fn with_nothing_enrolled(mut self) -> Self {
        self.enrolled = false;
        self
    }

    /// Make every prompt take this long before resolving.
    pub fn with_prompt_delay(mut self, delay: Duration) -> Self {
        self.prompt_delay = delay;
        self
    }

    /// Queue an outcome for the next prompt.
    pub fn script(self, outcome: BiometricOutcome) -> Self {
        self.scripted.lock().push_back(outcome);
        self
    }
}

impl Default for MockBiometric {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformBiometric for MockBiometric {
    async fn has_hardware(&self) -> Result<bool> {
        Ok(self.has_hardware)
    }

    async fn is_enrolled(&self) -> Result<bool> {
        Ok(self.enrolled)
    }

    async fn supported_types(&self) -> Result<Vec<BiometricType>> {
        Ok(self.types.clone())
    }

    async fn prompt(&self, _reason: &str) -> BiometricOutcome {
        if !self.prompt_delay.is_zero() {
            tokio::time::sleep(self.prompt_delay).await;
        }
        if let Some(outcome) = self.scripted.lock().pop_front() {
            return outcome;
        }
        BiometricOutcome::Success {
            biometric_type: *self.types.first().unwrap_or(&BiometricType::Generic),
        }
    }
}
