//! Simulated payment processing for MilleBit Pay
//!
//! There is no acquirer behind this crate. `authorize` looks up the paying
//! card, waits out a fixed processing delay, then records the payment with
//! a generated transaction reference. The host app drives the confirmation
//! screen from the returned record and the persisted history.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod simulator;

pub use error::{Error, Result};
pub use simulator::{PaymentSimulator, DEFAULT_PROCESSING_DELAY};
