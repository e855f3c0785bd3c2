//! Page-bridge message protocol.
//!
//! The extension cannot read the web app's local storage directly, so a
//! stateless relay script is injected into the page's own execution context.
//! These are the four message kinds exchanged with it.

use crate::types::{AuthSnapshot, Credential, UserProfile};
use serde::{Deserialize, Serialize};

/// Credential shape pushed into the web peer's storage.
///
/// Carries the primary role name separately because the web app keys its
/// framework state off it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAuthRecord {
    pub access_token: String,
    pub user: UserProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl From<&Credential> for WebAuthRecord {
    fn from(credential: &Credential) -> Self {
        Self {
            access_token: credential.access_token.clone(),
            user: credential.user.clone(),
            role: credential.user.primary_role().map(String::from),
        }
    }
}

/// Messages exchanged with the injected page-world relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeMessage {
    /// Ask the relay for the peer's current auth snapshot.
    #[serde(rename = "LINGORA_GET_WEB_AUTH")]
    GetWebAuth,

    /// Relay's reply carrying the peer's snapshot.
    #[serde(rename = "LINGORA_WEB_AUTH_DATA")]
    WebAuthData { snapshot: AuthSnapshot },

    /// Command the relay to persist this credential and reload the page so
    /// in-page state re-initializes from storage.
    #[serde(rename = "LINGORA_SET_WEB_AUTH")]
    SetWebAuth { record: WebAuthRecord },

    /// Peer-initiated logout signal: its stored token was rejected.
    #[serde(rename = "LINGORA_INVALID_TOKEN")]
    InvalidToken,
}

impl BridgeMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
