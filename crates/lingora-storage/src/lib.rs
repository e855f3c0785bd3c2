//! Extension-private credential storage.
//!
//! The [`CredentialStore`] is the single source of truth for "am I logged
//! in, and as whom" within the extension's storage domain. It persists the
//! whole [`Credential`](lingora_protocol::Credential) as one record, so
//! readers always observe either the old or the new session in full.

mod credentials;
mod error;
mod keys;
mod memory;
mod traits;

pub use credentials::CredentialStore;
pub use error::{StorageError, StorageResult};
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use traits::ExtensionStorage;
