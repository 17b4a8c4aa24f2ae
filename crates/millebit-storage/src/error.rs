//! Error types

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored value exists but cannot be decoded. Distinct from absence so
    /// data loss is never masked as an empty result.
    #[error("Corrupted value for key '{key}': {reason}")]
    Corrupted {
        /// The key whose value failed to decode
        key: String,
        /// Decode failure detail
        reason: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage error (generic)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
