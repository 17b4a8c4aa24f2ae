//! Biometric capability adapter for MilleBit Pay
//!
//! Thin bridge to the platform's biometric hardware: capability checks,
//! modality names for display, and a single prompt-based verification with
//! a one-at-a-time guard and a bounded timeout. The platform side is a
//! trait the host app implements; a mock ships for tests and for platforms
//! without native integration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod error;
pub mod service;

pub use adapter::{BiometricOutcome, BiometricType, MockBiometric, PlatformBiometric};
pub use error::{BiometricFailure, Error, Result};
pub use service::{BiometricService, DEFAULT_PROMPT_TIMEOUT};
