//! Action-tagged request/response protocol for the background context.
//!
//! Every request carries an `action` discriminator; every response is either
//! the operation's result or the single `{ "error": string }` shape. The
//! transport never raises for application-level failures, so callers must
//! check for the `error` key.

use crate::types::{
    AuthSnapshot, DictionaryEntry, Flashcard, PhraseTranslation, StudySet, UploadedImage,
    UserProfile,
};
use serde::{Deserialize, Serialize};

/// Request sent to the background context, discriminated by `action`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ActionRequest {
    LookupWord {
        term: String,
    },
    TranslatePhrase {
        text: String,
    },
    GetStudySets,
    CreateStudySet {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    AddFlashcard {
        study_set_id: String,
        front: String,
        back: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    GetCurrentUser,
    CheckAuth,
    SyncAuth {
        /// Peer snapshot relayed by the content script, when it has one;
        /// absent means the background should pull one through the bridge.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        snapshot: Option<AuthSnapshot>,
    },
    UploadImage {
        file_name: String,
        mime_type: String,
        /// Base64-encoded file contents.
        data: String,
    },
    PlayAudio {
        url: String,
    },
}

impl ActionRequest {
    /// The wire name of this request's action, for logging.
    pub fn action_name(&self) -> &'static str {
        match self {
            ActionRequest::LookupWord { .. } => "lookupWord",
            ActionRequest::TranslatePhrase { .. } => "translatePhrase",
            ActionRequest::GetStudySets => "getStudySets",
            ActionRequest::CreateStudySet { .. } => "createStudySet",
            ActionRequest::AddFlashcard { .. } => "addFlashcard",
            ActionRequest::Login { .. } => "login",
            ActionRequest::Logout => "logout",
            ActionRequest::GetCurrentUser => "getCurrentUser",
            ActionRequest::CheckAuth => "checkAuth",
            ActionRequest::SyncAuth { .. } => "syncAuth",
            ActionRequest::UploadImage { .. } => "uploadImage",
            ActionRequest::PlayAudio { .. } => "playAudio",
        }
    }
}

/// Outcome of one reconciliation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The peer's credential was written into the extension's store.
    Adopted,
    /// The extension's credential was relayed to the peer.
    Pushed,
    /// The peer signalled an invalid token; local credentials were cleared.
    LoggedOut,
    /// States already consistent; nothing changed.
    Noop,
    /// The message channel to the page is severed; sync is degraded until
    /// the page reloads.
    BridgeUnavailable,
}

/// Response from the background context: the result, or `{ error }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResponse {
    Error {
        error: String,
    },
    Dictionary(DictionaryEntry),
    Translation(PhraseTranslation),
    StudySets(Vec<StudySet>),
    StudySet(StudySet),
    Flashcard(Flashcard),
    Upload(UploadedImage),
    #[serde(rename_all = "camelCase")]
    User {
        user: Option<UserProfile>,
    },
    AuthStatus {
        authenticated: bool,
    },
    Sync {
        outcome: SyncOutcome,
    },
    Ack {},
}

impl ActionResponse {
    /// Build the error shape from anything displayable.
    pub fn error(message: impl std::fmt::Display) -> Self {
        ActionResponse::Error {
            error: message.to_string(),
        }
    }

    /// True when this is the `{ error }` shape.
    pub fn is_error(&self) -> bool {
        matches!(self, ActionResponse::Error { .. })
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Request envelope with a correlation id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Correlation id for matching responses to requests.
    pub id: String,
    #[serde(flatten)]
    pub request: ActionRequest,
}

impl RequestEnvelope {
    /// Wrap a request with a fresh correlation id.
    pub fn new(request: ActionRequest) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            request,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Response envelope echoing the request's correlation id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub id: String,
    #[serde(flatten)]
    pub response: ActionResponse,
}

impl ResponseEnvelope {
    /// Pair a response with the originating request's id.
    pub fn new(id: impl Into<String>, response: ActionResponse) -> Self {
        Self {
            id: id.into(),
            response,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
