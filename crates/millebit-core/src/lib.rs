//! MilleBit Pay wallet core domain types
//!
//! Pure domain logic shared by the storage, session, biometric, and payment
//! crates: the card model with its derived display fields, and the session
//! state machine the auth gate drives.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod card;
pub mod session;

pub use card::{clean_card_number, mask_card_number, Card, CardInput, MASK_MIN_DIGITS};
pub use session::{AuthSnapshot, SessionEvent, SessionState};
