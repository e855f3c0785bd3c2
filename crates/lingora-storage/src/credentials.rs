//! High-level API for the persisted session credential.

use crate::{ExtensionStorage, StorageKeys, StorageResult};
use lingora_protocol::Credential;

/// Single source of truth for the extension's session credential.
///
/// Holds at most one [`Credential`] at a time. The token and user are stored
/// as one JSON record under one key, so a write replaces the previous
/// session indivisibly and a read never sees a mixture of old and new.
pub struct CredentialStore {
    storage: Box<dyn ExtensionStorage>,
}

impl CredentialStore {
    /// Create a new credential store over the given storage backend.
    pub fn new(storage: Box<dyn ExtensionStorage>) -> Self {
        Self { storage }
    }

    /// Point-in-time read of the current credential. Never touches the network.
    pub fn read(&self) -> StorageResult<Option<Credential>> {
        match self.storage.get(StorageKeys::CREDENTIAL)? {
            Some(json) => {
                let credential: Credential = serde_json::from_str(&json)
                    .map_err(|e| crate::StorageError::Encoding(e.to_string()))?;
                Ok(Some(credential))
            }
            None => Ok(None),
        }
    }

    /// Atomically replace any existing credential.
    pub fn write(&self, credential: &Credential) -> StorageResult<()> {
        let json = serde_json::to_string(credential)
            .map_err(|e| crate::StorageError::Encoding(e.to_string()))?;
        self.storage.set(StorageKeys::CREDENTIAL, &json)
    }

    /// Swap in a new access token, keeping the stored user.
    ///
    /// Returns false when no credential exists to update (nothing written).
    /// Used by the refresh path, which receives only a token.
    pub fn replace_access_token(&self, access_token: &str) -> StorageResult<bool> {
        match self.read()? {
            Some(mut credential) => {
                credential.access_token = access_token.to_string();
                self.write(&credential)?;
                Ok(true)
            }
            None => {
                tracing::debug!("No stored credential to refresh");
                Ok(false)
            }
        }
    }

    /// Remove the credential entirely. Returns true if one existed.
    ///
    /// Used on logout and on terminal auth failure.
    pub fn clear(&self) -> StorageResult<bool> {
        self.storage.delete(StorageKeys::CREDENTIAL)
    }

    /// Whether a credential is currently persisted.
    pub fn is_authenticated(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::CREDENTIAL)
    }

    /// The current access token, if logged in.
    pub fn access_token(&self) -> StorageResult<Option<String>> {
        Ok(self.read()?.map(|c| c.access_token))
    }
}
