//! Typed endpoints over the request pipeline.
//!
//! Each method names one server operation; deserialization of the envelope's
//! `metaData` payload happens here so callers work with protocol types only.

use crate::client::{ApiClient, Payload};
use crate::error::{ApiError, ApiResult};
use lingora_protocol::{
    DictionaryEntry, Flashcard, LoginData, PhraseTranslation, StudySet, UploadedImage, UserProfile,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::form_urlencoded;

/// Pull the typed payload out of the `metaData` envelope field.
fn meta_data<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    let meta = body
        .get("metaData")
        .cloned()
        .ok_or_else(|| ApiError::Decode("response missing metaData".to_string()))?;
    serde_json::from_value(meta).map_err(|e| ApiError::Decode(e.to_string()))
}

impl ApiClient {
    /// Authenticate with email and password.
    ///
    /// Unauthenticated call; on success the server also sets the refresh
    /// cookie on this client's cookie store. Does not persist the
    /// credential, the caller decides that.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<LoginData> {
        let body = self
            .request(
                Method::POST,
                "auth/login",
                Payload::Json(json!({ "email": email, "password": password })),
                true,
            )
            .await?;
        meta_data(body)
    }

    /// Invalidate the server-side session.
    ///
    /// Authenticated call; clearing the local credential is the caller's job
    /// and happens even if this request fails.
    pub async fn logout(&self) -> ApiResult<()> {
        self.request(Method::POST, "auth/logout", Payload::Empty, false)
            .await?;
        Ok(())
    }

    /// Fetch the profile of the currently authenticated user.
    pub async fn current_user(&self) -> ApiResult<UserProfile> {
        let body = self
            .request(Method::GET, "auth/me", Payload::Empty, false)
            .await?;
        meta_data(body)
    }

    /// Look up a dictionary entry for a single term.
    pub async fn lookup_word(&self, term: &str) -> ApiResult<DictionaryEntry> {
        let encoded: String = form_urlencoded::byte_serialize(term.as_bytes()).collect();
        let body = self
            .request(
                Method::GET,
                &format!("words/dictionary?term={}", encoded),
                Payload::Empty,
                false,
            )
            .await?;
        meta_data(body)
    }

    /// Translate a full phrase.
    pub async fn translate_phrase(&self, text: &str) -> ApiResult<PhraseTranslation> {
        let body = self
            .request(
                Method::POST,
                "translate/phrase",
                Payload::Json(json!({ "text": text })),
                false,
            )
            .await?;
        meta_data(body)
    }

    /// List the study sets owned by the current user.
    pub async fn own_study_sets(&self) -> ApiResult<Vec<StudySet>> {
        let body = self
            .request(Method::GET, "studysets/own", Payload::Empty, false)
            .await?;
        meta_data(body)
    }

    /// Create a study set.
    pub async fn create_study_set(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> ApiResult<StudySet> {
        let body = self
            .request(
                Method::POST,
                "studysets",
                Payload::Json(json!({ "title": title, "description": description })),
                false,
            )
            .await?;
        meta_data(body)
    }

    /// Add a flashcard to an existing study set.
    pub async fn add_flashcard(
        &self,
        study_set_id: &str,
        front: &str,
        back: &str,
        image_url: Option<&str>,
    ) -> ApiResult<Flashcard> {
        let body = self
            .request(
                Method::POST,
                &format!("studysets/{}/flashcards", study_set_id),
                Payload::Json(json!({
                    "front": front,
                    "back": back,
                    "imageUrl": image_url,
                })),
                false,
            )
            .await?;
        meta_data(body)
    }

    /// Upload an image for use on a flashcard.
    ///
    /// Multipart call; the body is rebuilt from these raw parts if the
    /// pipeline has to retry after a token refresh.
    pub async fn upload_image(
        &self,
        file_name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> ApiResult<UploadedImage> {
        let body = self
            .request(
                Method::POST,
                "uploads/image",
                Payload::ImageForm {
                    field: "image".to_string(),
                    file_name: file_name.to_string(),
                    mime_type: mime_type.to_string(),
                    bytes,
                },
                false,
            )
            .await?;
        meta_data(body)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn meta_data_extracts_typed_payload() {
        let body = json!({ "metaData": { "accessToken": "tok", "user": {
            "id": "u1", "email": "a@b.c", "fullName": "A B", "roles": []
        }}, "message": "ok" });
        let login: LoginData = meta_data(body).unwrap();
        assert_eq!(login.access_token, "tok");
        assert_eq!(login.user.id, "u1");
    }

    #[test]
    fn meta_data_missing_is_decode_error() {
        let err = meta_data::<LoginData>(json!({ "message": "ok" })).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn term_encoding_survives_spaces_and_unicode() {
        let encoded: String = form_urlencoded::byte_serialize("café au lait".as_bytes()).collect();
        assert_eq!(encoded, "caf%C3%A9+au+lait");
    }
}
