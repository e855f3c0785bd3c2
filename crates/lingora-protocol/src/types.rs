//! Auth data model and REST payload types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A role attached to a user profile.
///
/// Opaque passenger data; the core only ever reads the first role's name
/// when pushing auth state to the web peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
}

/// User profile as returned by the study-set service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    /// Ordered; the first entry is the primary role.
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl UserProfile {
    /// Name of the primary (first) role, if any.
    pub fn primary_role(&self) -> Option<&str> {
        self.roles.first().map(|r| r.name.as_str())
    }
}

/// One authenticated session: the persisted access token plus its user.
///
/// At most one Credential is persisted at a time; absence means logged out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
    pub user: UserProfile,
}

/// A transient, read-only view of one storage domain's auth state.
///
/// Produced by observation (extension storage or the web peer via the
/// bridge), consumed immediately, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSnapshot {
    pub access_token: Option<String>,
    pub user: Option<UserProfile>,
    /// When this state was observed.
    pub observed_at: DateTime<Utc>,
}

impl AuthSnapshot {
    /// Snapshot of an authenticated domain.
    pub fn authenticated(access_token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            access_token: Some(access_token.into()),
            user: Some(user),
            observed_at: Utc::now(),
        }
    }

    /// Snapshot of a logged-out domain.
    pub fn unauthenticated() -> Self {
        Self {
            access_token: None,
            user: None,
            observed_at: Utc::now(),
        }
    }

    /// True when both a token and a user were observed.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    /// The observed token, if any.
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl From<&Credential> for AuthSnapshot {
    fn from(credential: &Credential) -> Self {
        Self::authenticated(credential.access_token.clone(), credential.user.clone())
    }
}

/// Login response payload: the new session's token and user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub access_token: String,
    pub user: UserProfile,
}

/// One sense of a dictionary entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMeaning {
    pub part_of_speech: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// Dictionary lookup result for a single term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub meanings: Vec<WordMeaning>,
}

/// Phrase translation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhraseTranslation {
    pub source_text: String,
    pub translated_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

/// A study set owned by the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySet {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub flashcard_count: u32,
}

/// A flashcard saved into a study set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub front: String,
    pub back: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Result of an image upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub url: String,
}
