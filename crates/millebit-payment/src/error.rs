//! Error types

/// Payment simulation errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying storage failure.
    #[error("Storage error: {0}")]
    Storage(#[from] millebit_storage::Error),

    /// The referenced card does not exist.
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// The requested amount is not payable.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
