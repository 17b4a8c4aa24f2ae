//! Session state machine types for the authentication gate

use serde::{Deserialize, Serialize};

/// Authentication gate state.
///
/// The state starts at `Unknown` until storage has been read, then resolves
/// to one of the unauthenticated states. `Authenticated` is in-memory only
/// and is never persisted, so every process start begins unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Storage has not been read yet.
    Unknown,
    /// No credential or access-code setup has ever completed on this device.
    FirstRun,
    /// Onboarding completed previously; the user must sign in.
    Returning,
    /// The user has signed in during this process lifetime.
    Authenticated,
}

impl SessionState {
    /// Whether the user may reach the authenticated area.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }

    /// Display name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unknown => "Unknown",
            SessionState::FirstRun => "FirstRun",
            SessionState::Returning => "Returning",
            SessionState::Authenticated => "Authenticated",
        }
    }
}

/// Session transition events emitted by the session manager.
///
/// Subscribers (the navigation layer in the host app) react to these
/// instead of the manager calling into the UI directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user signed in.
    SignedIn,
    /// The user signed out. `wiped` is true when the sign-out cascaded into
    /// a wipe of cards and credentials.
    SignedOut {
        /// Whether persisted data was wiped as part of the sign-out.
        wiped: bool,
    },
    /// Onboarding completed: credentials or an access code were configured
    /// for the first time.
    Onboarded,
    /// All persisted data was cleared outside of a sign-out.
    DataCleared,
}

/// Snapshot of the auth gate's derived flags, for the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    /// Current session state.
    pub state: SessionState,
    /// Whether stored credentials (email + password) exist.
    pub has_credentials: bool,
    /// Whether a stored access code exists.
    pub has_access_code: bool,
    /// Whether onboarding has never completed.
    pub is_first_time: bool,
}
