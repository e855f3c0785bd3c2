//! API error types.

use thiserror::Error;

/// API error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (timeout, connection refused, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response carrying the server's message
    #[error("Request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    /// Token refresh failed after a 401; local credentials were cleared
    #[error("Session expired")]
    SessionExpired,

    /// Credential storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] lingora_storage::StorageError),

    /// Response body did not match the expected shape
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
