//! Error types and the prompt failure taxonomy

/// Crate errors: storage and platform-bridge failures.
///
/// Prompt outcomes are never `Error`s; they are reported through
/// [`BiometricFailure`] inside a tagged result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying storage failure (the enablement flag).
    #[error("Storage error: {0}")]
    Storage(#[from] millebit_storage::Error),

    /// Platform bridge failure outside of a prompt.
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Why a biometric prompt did not succeed.
///
/// Mirrors the platform error codes the mobile side reports, plus the two
/// conditions the service itself introduces (`InProgress`, `TimedOut`).
/// The adapter never retries; retry policy belongs to the calling screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiometricFailure {
    /// The user dismissed the prompt.
    UserCancel,
    /// The system dismissed the prompt (app backgrounded, etc.).
    SystemCancel,
    /// The user chose the non-biometric fallback.
    FallbackRequested,
    /// Hardware present but no biometric credential enrolled.
    NotEnrolled,
    /// No usable biometric hardware.
    NotAvailable,
    /// The presented biometric did not match.
    AuthenticationFailed,
    /// Another prompt is already in flight.
    InProgress,
    /// The prompt did not resolve within the configured timeout.
    TimedOut,
    /// Unrecognized platform error code.
    Unknown(String),
}

impl BiometricFailure {
    /// Stable error code string, as surfaced to the host app.
    pub fn code(&self) -> &str {
        match self {
            BiometricFailure::UserCancel => "user_cancel",
            BiometricFailure::SystemCancel => "system_cancel",
            BiometricFailure::FallbackRequested => "fallback_requested",
            BiometricFailure::NotEnrolled => "not_enrolled",
            BiometricFailure::NotAvailable => "not_available",
            BiometricFailure::AuthenticationFailed => "authentication_failed",
            BiometricFailure::InProgress => "in_progress",
            BiometricFailure::TimedOut => "timed_out",
            BiometricFailure::Unknown(_) => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_codes_are_stable() {
        assert_eq!(BiometricFailure::UserCancel.code(), "user_cancel");
        assert_eq!(BiometricFailure::TimedOut.code(), "timed_out");
        assert_eq!(
            BiometricFailure::Unknown("weird".to_string()).code(),
            "unknown"
        );
    }
}
