//! Wire types shared across the Lingora extension contexts.
//!
//! Three message surfaces live here:
//! - the auth data model (credentials, profiles, snapshots),
//! - the action-tagged request/response protocol between the popup/content
//!   contexts and the background context,
//! - the page-bridge protocol spoken with the injected page-world relay.

mod actions;
mod bridge;
mod types;

pub use actions::{ActionRequest, ActionResponse, RequestEnvelope, ResponseEnvelope, SyncOutcome};
pub use bridge::{BridgeMessage, WebAuthRecord};
pub use types::{
    AuthSnapshot, Credential, DictionaryEntry, Flashcard, LoginData, PhraseTranslation, Role,
    StudySet, UploadedImage, UserProfile, WordMeaning,
};
