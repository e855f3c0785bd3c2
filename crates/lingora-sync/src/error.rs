//! Synchronizer error types.

use thiserror::Error;

/// Synchronizer error type.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The message channel to the page is severed, typically because the
    /// extension was reloaded while the page stayed open
    #[error("Bridge unavailable: extension context invalidated")]
    BridgeUnavailable,

    /// The peer answered with something other than a snapshot
    #[error("Unexpected bridge reply: {0}")]
    Protocol(String),

    /// Credential storage failure
    #[error("Storage error: {0}")]
    Storage(#[from] lingora_storage::StorageError),
}

/// Result type alias using SyncError.
pub type SyncResult<T> = Result<T, SyncError>;
