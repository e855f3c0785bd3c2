//! The seam between the synchronizer and the page-world relay.

use crate::error::SyncResult;
use async_trait::async_trait;
use lingora_protocol::{AuthSnapshot, WebAuthRecord};

/// Message relay into the web page's execution context.
///
/// The extension cannot touch the page's storage directly; an injected
/// script answers snapshot requests and applies pushed credentials on its
/// behalf. The relay is stateless. Implementations signal a severed channel
/// with [`SyncError::BridgeUnavailable`](crate::SyncError::BridgeUnavailable).
#[async_trait]
pub trait PeerBridge: Send + Sync {
    /// Ask the page for its current auth state.
    async fn request_snapshot(&self) -> SyncResult<AuthSnapshot>;

    /// Write a credential into the page's storage.
    ///
    /// The page reloads itself afterwards so its in-memory state
    /// re-initializes from storage.
    async fn push_credential(&self, record: &WebAuthRecord) -> SyncResult<()>;
}
