//! Storage error types.

use thiserror::Error;

/// Storage error type.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying storage backend failure
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Serialization/deserialization failure
    #[error("Encoding error: {0}")]
    Encoding(String),
}

/// Result type alias using StorageError.
pub type StorageResult<T> = Result<T, StorageError>;
