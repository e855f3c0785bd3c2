//! Request dispatch for the background context.

use base64::Engine as _;
use lingora_api::ApiClient;
use lingora_protocol::{
    ActionRequest, ActionResponse, Credential, RequestEnvelope, ResponseEnvelope,
};
use lingora_storage::CredentialStore;
use lingora_sync::AuthSynchronizer;
use std::sync::Arc;

/// Routes every inbound action to its operation.
///
/// Failures are folded into the `{ error }` response shape; the caller's
/// message channel never observes a fault.
pub struct Dispatcher {
    api: ApiClient,
    sync: AuthSynchronizer,
}

impl Dispatcher {
    pub fn new(api: ApiClient, sync: AuthSynchronizer) -> Self {
        Self { api, sync }
    }

    fn store(&self) -> &Arc<CredentialStore> {
        self.api.store()
    }

    /// Handle one action and produce its response.
    pub async fn handle(&self, request: ActionRequest) -> ActionResponse {
        tracing::debug!(action = request.action_name(), "Dispatching action");

        let response = match request {
            ActionRequest::LookupWord { term } => self
                .api
                .lookup_word(&term)
                .await
                .map(ActionResponse::Dictionary)
                .unwrap_or_else(ActionResponse::error),

            ActionRequest::TranslatePhrase { text } => self
                .api
                .translate_phrase(&text)
                .await
                .map(ActionResponse::Translation)
                .unwrap_or_else(ActionResponse::error),

            ActionRequest::GetStudySets => self
                .api
                .own_study_sets()
                .await
                .map(ActionResponse::StudySets)
                .unwrap_or_else(ActionResponse::error),

            ActionRequest::CreateStudySet { title, description } => self
                .api
                .create_study_set(&title, description.as_deref())
                .await
                .map(ActionResponse::StudySet)
                .unwrap_or_else(ActionResponse::error),

            ActionRequest::AddFlashcard {
                study_set_id,
                front,
                back,
                image_url,
            } => self
                .api
                .add_flashcard(&study_set_id, &front, &back, image_url.as_deref())
                .await
                .map(ActionResponse::Flashcard)
                .unwrap_or_else(ActionResponse::error),

            ActionRequest::Login { email, password } => self.login(&email, &password).await,

            ActionRequest::Logout => self.logout().await,

            ActionRequest::GetCurrentUser => {
                self.reconcile_if_diverged().await;
                match self.store().read() {
                    Ok(credential) => ActionResponse::User {
                        user: credential.map(|c| c.user),
                    },
                    Err(e) => ActionResponse::error(e),
                }
            }

            ActionRequest::CheckAuth => {
                self.reconcile_if_diverged().await;
                match self.store().is_authenticated() {
                    Ok(authenticated) => ActionResponse::AuthStatus { authenticated },
                    Err(e) => ActionResponse::error(e),
                }
            }

            ActionRequest::SyncAuth { snapshot } => {
                let result = match snapshot {
                    Some(snapshot) => self.sync.reconcile_snapshot(snapshot).await,
                    None => self.sync.reconcile().await,
                };
                result
                    .map(|outcome| ActionResponse::Sync { outcome })
                    .unwrap_or_else(ActionResponse::error)
            }

            ActionRequest::UploadImage {
                file_name,
                mime_type,
                data,
            } => self.upload_image(&file_name, &mime_type, &data).await,

            // Playback happens in the page; the background only acknowledges.
            ActionRequest::PlayAudio { url } => {
                tracing::debug!(url = %url, "Audio playback acknowledged");
                ActionResponse::Ack {}
            }
        };

        if let ActionResponse::Error { error } = &response {
            tracing::warn!(error = %error, "Action failed");
        }
        response
    }

    /// Handle an enveloped request, echoing its correlation id.
    pub async fn handle_envelope(&self, envelope: RequestEnvelope) -> ResponseEnvelope {
        let RequestEnvelope { id, request } = envelope;
        ResponseEnvelope::new(id, self.handle(request).await)
    }

    /// Stored auth queried while differing from the last reconciled state is
    /// itself a reconciliation trigger; run a cycle before answering.
    async fn reconcile_if_diverged(&self) {
        let token = match self.store().access_token() {
            Ok(token) => token,
            Err(_) => return,
        };
        if self.sync.needs_reconcile(token.as_deref()) {
            tracing::debug!("Stored auth diverged since last sync cycle; reconciling");
            if let Err(e) = self.sync.reconcile().await {
                tracing::warn!(error = %e, "Reconciliation on auth query failed");
            }
        }
    }

    async fn login(&self, email: &str, password: &str) -> ActionResponse {
        let login = match self.api.login(email, password).await {
            Ok(login) => login,
            Err(e) => return ActionResponse::error(e),
        };

        let credential = Credential {
            access_token: login.access_token,
            user: login.user,
        };
        if let Err(e) = self.store().write(&credential) {
            return ActionResponse::error(e);
        }

        tracing::info!(user = %credential.user.email, "Logged in");
        ActionResponse::User {
            user: Some(credential.user),
        }
    }

    /// Local state is cleared even when the remote call fails; the server
    /// session expires on its own.
    async fn logout(&self) -> ActionResponse {
        if let Err(e) = self.api.logout().await {
            tracing::debug!(error = %e, "Remote logout failed; clearing local state anyway");
        }
        match self.store().clear() {
            Ok(_) => {
                tracing::info!("Logged out");
                ActionResponse::Ack {}
            }
            Err(e) => ActionResponse::error(e),
        }
    }

    async fn upload_image(&self, file_name: &str, mime_type: &str, data: &str) -> ActionResponse {
        let bytes = match base64::engine::general_purpose::STANDARD.decode(data) {
            Ok(bytes) => bytes,
            Err(e) => return ActionResponse::error(format!("invalid image data: {}", e)),
        };
        self.api
            .upload_image(file_name, mime_type, bytes)
            .await
            .map(ActionResponse::Upload)
            .unwrap_or_else(ActionResponse::error)
    }
}
