//! Cross-context auth synchronization.
//!
//! The extension and the Lingora web app each keep their own session record
//! in storage the other side cannot read. [`AuthSynchronizer`] reconciles the
//! two through a [`PeerBridge`], a narrow message relay into the page's
//! execution context.

mod bridge;
mod error;
mod sync;

pub use bridge::PeerBridge;
pub use error::{SyncError, SyncResult};
pub use sync::AuthSynchronizer;
