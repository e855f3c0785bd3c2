//! The request pipeline: auth-header injection, content negotiation, and
//! one-shot recovery from expired tokens.

use crate::error::{ApiError, ApiResult};
use lingora_storage::CredentialStore;
use reqwest::{header, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Cookie-authenticated refresh endpoint (no bearer attached).
const REFRESH_ENDPOINT: &str = "auth/refresh-token";

/// Body of an outbound request.
///
/// The image form variant keeps the raw parts rather than a built multipart
/// form so the 401 retry can reissue an identical request (multipart forms
/// are consumed on send).
#[derive(Debug, Clone)]
pub enum Payload {
    /// No body.
    Empty,
    /// JSON body; sets `Content-Type: application/json`.
    Json(Value),
    /// Binary form payload; the transport sets its own boundary header.
    ImageForm {
        field: String,
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

/// One logical API call, including its retry budget.
#[derive(Debug, Clone)]
struct PendingRequest {
    method: Method,
    endpoint: String,
    payload: Payload,
    skip_auth: bool,
    retries_used: u8,
}

/// Envelope every JSON response from the service follows.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "metaData", default)]
    meta_data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// REST client for the study-set service.
///
/// Shares the [`CredentialStore`] with the auth synchronizer; a refresh
/// performed here is immediately visible to every other reader.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: Arc<CredentialStore>,
}

impl ApiClient {
    /// Create a new client.
    ///
    /// The cookie store carries the persistent refresh cookie the
    /// `auth/refresh-token` endpoint authenticates with; `timeout` is the
    /// fixed budget for every network call.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        store: Arc<CredentialStore>,
    ) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            store,
        })
    }

    /// Create a client from the loaded configuration.
    pub fn from_config(
        config: &lingora_core::Config,
        store: Arc<CredentialStore>,
    ) -> ApiResult<Self> {
        Self::new(config.api_base_url.clone(), config.request_timeout(), store)
    }

    /// The credential store this client reads tokens from.
    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Resolve an endpoint path against the base URL; absolute URLs pass through.
    fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Perform one logical API call.
    ///
    /// Attaches `Authorization: Bearer <token>` when a token exists and
    /// `skip_auth` is false. A 401 on an authenticated call triggers exactly
    /// one token refresh and one retry of the identical request; a failed
    /// refresh clears the credential store and surfaces
    /// [`ApiError::SessionExpired`]. A second 401 after the retry is
    /// terminal and reported like any other non-2xx response.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        payload: Payload,
        skip_auth: bool,
    ) -> ApiResult<Value> {
        let mut pending = PendingRequest {
            method,
            endpoint: endpoint.to_string(),
            payload,
            skip_auth,
            retries_used: 0,
        };

        let response = self.send(&pending).await?;

        if response.status() == StatusCode::UNAUTHORIZED
            && !pending.skip_auth
            && pending.retries_used == 0
        {
            tracing::debug!(endpoint = %pending.endpoint, "Unauthorized; attempting token refresh");

            if self.refresh_access_token().await {
                pending.retries_used += 1;
                let retried = self.send(&pending).await?;
                return Self::handle_response(retried).await;
            }

            self.store.clear()?;
            tracing::warn!(endpoint = %pending.endpoint, "Token refresh failed; session expired");
            return Err(ApiError::SessionExpired);
        }

        Self::handle_response(response).await
    }

    /// Build and send a single HTTP attempt.
    async fn send(&self, pending: &PendingRequest) -> ApiResult<reqwest::Response> {
        let url = self.resolve_url(&pending.endpoint);
        let mut builder = self.http.request(pending.method.clone(), &url);

        if !pending.skip_auth {
            if let Some(token) = self.store.access_token()? {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
        }

        builder = match &pending.payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(value),
            Payload::ImageForm {
                field,
                file_name,
                mime_type,
                bytes,
            } => {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime_type)
                    .map_err(|e| ApiError::Decode(format!("invalid mime type: {}", e)))?;
                builder.multipart(reqwest::multipart::Form::new().part(field.clone(), part))
            }
        };

        Ok(builder.send().await?)
    }

    /// Normalize a response into the envelope value or a typed failure.
    ///
    /// JSON bodies are parsed as-is; non-empty text becomes a message
    /// object; empty bodies become an empty result. Non-2xx statuses fail
    /// with the server's message when one is present.
    async fn handle_response(response: reqwest::Response) -> ApiResult<Value> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false);
        let text = response.text().await?;

        let body: Value = if is_json && !text.is_empty() {
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?
        } else if text.is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::json!({ "message": text })
        };

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Attempt to refresh the access token.
    ///
    /// Credential-less POST relying on the persistent refresh cookie. On
    /// success the new token from `metaData.accessToken` is persisted. Any
    /// failure (network error, non-2xx, missing field) returns false
    /// without raising; the caller decides the terminal action.
    pub async fn refresh_access_token(&self) -> bool {
        let url = self.resolve_url(REFRESH_ENDPOINT);

        let response = match self.http.post(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh request failed");
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Token refresh rejected");
            return false;
        }

        let envelope: Envelope = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh returned malformed body");
                return false;
            }
        };

        let token = envelope
            .meta_data
            .as_ref()
            .and_then(|meta| meta.get("accessToken"))
            .and_then(Value::as_str);

        match token {
            Some(token) => match self.store.replace_access_token(token) {
                Ok(true) => {
                    tracing::debug!("Access token refreshed");
                    true
                }
                Ok(false) => {
                    tracing::warn!("Refresh succeeded but no credential to update");
                    false
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to persist refreshed token");
                    false
                }
            },
            None => {
                if let Some(message) = envelope.message {
                    tracing::warn!(message = %message, "Refresh response missing access token");
                } else {
                    tracing::warn!("Refresh response missing access token");
                }
                false
            }
        }
    }
}
