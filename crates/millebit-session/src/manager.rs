//! Session manager: auth state machine, onboarding, sign-out cascade

use crate::{Error, Result};
use millebit_core::{AuthSnapshot, SessionEvent, SessionState};
use millebit_storage::{
    CardStore, CredentialStore, KvStore, SettingsStore, TransactionStore,
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Process-wide authentication gate.
///
/// Cheap to clone; all clones share one state cell and one event channel.
/// `Authenticated` lives only in memory, so every process start begins in
/// `Unknown` until [`SessionManager::load`] resolves the stored flags.
#[derive(Clone)]
pub struct SessionManager {
    state: Arc<RwLock<SessionState>>,
    credentials: CredentialStore,
    cards: CardStore,
    settings: SettingsStore,
    transactions: TransactionStore,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Create a manager over the shared key-value store.
    ///
    /// The state stays `Unknown` until [`load`](Self::load) is called.
    pub fn new(kv: KvStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(SessionState::Unknown)),
            credentials: CredentialStore::new(kv.clone()),
            cards: CardStore::new(kv.clone()),
            settings: SettingsStore::new(kv.clone()),
            transactions: TransactionStore::new(kv),
            events,
        }
    }

    /// Resolve the initial state from storage.
    ///
    /// Stored credentials are authoritative: a cleared first-run marker
    /// with neither credentials nor an access code still resolves to
    /// `FirstRun`, so onboarding can rerun instead of stranding the user at
    /// a sign-in screen with nothing to verify against.
    pub fn load(&self) -> Result<SessionState> {
        let is_first_time = self.credentials.is_first_time()?;
        let has_credentials = self.credentials.has_credentials()?;
        let has_access_code = self.credentials.has_access_code()?;

        let resolved = if !is_first_time && (has_credentials || has_access_code) {
            SessionState::Returning
        } else {
            SessionState::FirstRun
        };

        let mut state = self.state.write();
        // A signed-in session survives a redundant load.
        if *state != SessionState::Authenticated {
            *state = resolved;
        }
        tracing::info!(state = state.name(), "Session state loaded");
        Ok(*state)
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    /// Whether the user may reach the authenticated area.
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    /// Derived flags for the host UI.
    pub fn snapshot(&self) -> Result<AuthSnapshot> {
        Ok(AuthSnapshot {
            state: self.state(),
            has_credentials: self.credentials.has_credentials()?,
            has_access_code: self.credentials.has_access_code()?,
            is_first_time: self.credentials.is_first_time()?,
        })
    }

    /// Subscribe to session transition events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Flip the session to `Authenticated`.
    ///
    /// Verification (access code, credentials, or biometric) is the
    /// caller's responsibility; this only transitions state and notifies
    /// subscribers. Idempotent when already authenticated.
    pub fn sign_in(&self) -> Result<()> {
        let mut state = self.state.write();
        match *state {
            SessionState::Unknown => return Err(Error::NotLoaded),
            SessionState::Authenticated => return Ok(()),
            SessionState::FirstRun | SessionState::Returning => {
                *state = SessionState::Authenticated;
            }
        }
        drop(state);

        tracing::info!("Signed in");
        let _ = self.events.send(SessionEvent::SignedIn);
        Ok(())
    }

    /// Leave the authenticated area.
    ///
    /// With `cascade`, all persisted data is wiped (cards, credentials,
    /// access code, biometric flag, payment history) and the session
    /// resolves back to `FirstRun`; without it, the user becomes a
    /// returning, signed-out user.
    pub fn sign_out(&self, cascade: bool) -> Result<()> {
        if cascade {
            self.wipe_all()?;
        }

        let mut state = self.state.write();
        *state = if cascade {
            SessionState::FirstRun
        } else {
            SessionState::Returning
        };
        drop(state);

        tracing::info!(cascade, "Signed out");
        let _ = self.events.send(SessionEvent::SignedOut { wiped: cascade });
        Ok(())
    }

    /// Persist credentials and complete onboarding.
    ///
    /// Storage failures propagate; they are never folded into a boolean.
    pub fn set_credentials(&self, username: &str, email: &str, password: &str) -> Result<()> {
        self.credentials.set_credentials(username, email, password)?;
        self.leave_first_run();
        let _ = self.events.send(SessionEvent::Onboarded);
        Ok(())
    }

    /// Compare against stored credentials. Mismatch is `Ok(false)`.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<bool> {
        Ok(self.credentials.verify_credentials(email, password)?)
    }

    /// Persist the access code and complete onboarding.
    pub fn set_access_code(&self, code: &str) -> Result<()> {
        self.credentials.set_access_code(code)?;
        self.leave_first_run();
        let _ = self.events.send(SessionEvent::Onboarded);
        Ok(())
    }

    /// Compare against the stored access code. Mismatch is `Ok(false)`.
    pub fn verify_access_code(&self, code: &str) -> Result<bool> {
        Ok(self.credentials.verify_access_code(code)?)
    }

    /// Remove credentials and the access code, returning to first-run.
    pub fn clear_credentials(&self) -> Result<()> {
        self.credentials.clear()?;

        let mut state = self.state.write();
        if *state != SessionState::Authenticated {
            *state = SessionState::FirstRun;
        }
        Ok(())
    }

    /// Wipe everything persisted and return to first-run.
    pub fn clear_all_data(&self) -> Result<()> {
        self.wipe_all()?;

        let mut state = self.state.write();
        *state = SessionState::FirstRun;
        drop(state);

        let _ = self.events.send(SessionEvent::DataCleared);
        Ok(())
    }

    fn wipe_all(&self) -> Result<()> {
        self.cards.clear_all()?;
        self.credentials.clear()?;
        self.settings.clear_biometric_state()?;
        self.transactions.clear()?;
        tracing::info!("All persisted data wiped");
        Ok(())
    }

    fn leave_first_run(&self) {
        let mut state = self.state.write();
        if *state == SessionState::FirstRun {
            *state = SessionState::Returning;
        }
    }
}
