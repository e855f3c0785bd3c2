//! Storage key constants.

/// Storage keys used by the extension.
pub struct StorageKeys;

impl StorageKeys {
    /// The current session's credential (JSON: access token + user profile).
    /// Stored as a single record so the pair is replaced indivisibly.
    pub const CREDENTIAL: &'static str = "lingora_credential";
}
