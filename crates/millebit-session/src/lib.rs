//! Authentication gate for MilleBit Pay
//!
//! Single source of truth for whether the user may reach the authenticated
//! area. Owns the session state machine, first-run detection, credential
//! and access-code verification, and the sign-out cascade. Session changes
//! are broadcast as events; nothing here calls into the UI.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod manager;

pub use error::{Error, Result};
pub use manager::SessionManager;
