//! Error types

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying storage failure. Never conflated with a verification
    /// mismatch, which is a plain boolean.
    #[error("Storage error: {0}")]
    Storage(#[from] millebit_storage::Error),

    /// An operation that needs a resolved session state ran before
    /// `load()` completed.
    #[error("Session state has not been loaded yet")]
    NotLoaded,
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
