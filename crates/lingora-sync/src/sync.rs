//! The reconciliation state machine.

use crate::bridge::PeerBridge;
use crate::error::{SyncError, SyncResult};
use lingora_protocol::{AuthSnapshot, Credential, SyncOutcome, WebAuthRecord};
use lingora_storage::CredentialStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The (peer token, extension token) pair a cycle ran against.
type ReconciledPair = (Option<String>, Option<String>);

/// Keeps the extension's credential and the web peer's session record
/// consistent.
///
/// Transition rules run in priority order on every observation:
/// an authenticated peer wins on any mismatch (the page is where
/// interactive logins happen), then an authenticated extension pushes to a
/// logged-out peer, and matching state is left alone. A cycle over inputs
/// identical to the previous one performs no writes and sends no messages.
pub struct AuthSynchronizer {
    store: Arc<CredentialStore>,
    bridge: Box<dyn PeerBridge>,
    last_reconciled: Mutex<Option<ReconciledPair>>,
}

impl AuthSynchronizer {
    pub fn new(store: Arc<CredentialStore>, bridge: Box<dyn PeerBridge>) -> Self {
        Self {
            store,
            bridge,
            last_reconciled: Mutex::new(None),
        }
    }

    /// A poisoned cache still holds a coherent pair; recover it rather than
    /// letting a panic elsewhere take reconciliation down with it.
    fn cache(&self) -> MutexGuard<'_, Option<ReconciledPair>> {
        self.last_reconciled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// True when the extension's stored auth no longer matches the state the
    /// last cycle settled on.
    ///
    /// Queries of the extension's own auth (`checkAuth`, `getCurrentUser`)
    /// call this with the token they just read; a true answer means the
    /// store drifted since the last known peer snapshot and a cycle should
    /// run. Before any cycle there is nothing to diverge from.
    pub fn needs_reconcile(&self, extension_token: Option<&str>) -> bool {
        match self.cache().as_ref() {
            Some((_, settled_extension)) => settled_extension.as_deref() != extension_token,
            None => false,
        }
    }

    /// Run one full cycle: observe the peer through the bridge, then
    /// reconcile.
    ///
    /// A severed bridge is the documented degraded mode, not a failure: the
    /// user has to reload the page before sync can resume.
    pub async fn reconcile(&self) -> SyncResult<SyncOutcome> {
        match self.bridge.request_snapshot().await {
            Ok(snapshot) => self.reconcile_snapshot(snapshot).await,
            Err(SyncError::BridgeUnavailable) => {
                tracing::warn!(
                    "Auth sync bridge unavailable; reload the page to resume syncing"
                );
                Ok(SyncOutcome::BridgeUnavailable)
            }
            Err(e) => Err(e),
        }
    }

    /// Reconcile against an already-observed peer snapshot.
    pub async fn reconcile_snapshot(&self, peer: AuthSnapshot) -> SyncResult<SyncOutcome> {
        let peer_credential = Self::peer_credential(&peer);
        let peer_token = peer_credential
            .as_ref()
            .map(|c| c.access_token.clone());

        let extension = self.store.read()?;
        let extension_token = extension.as_ref().map(|c| c.access_token.clone());

        let pair = (peer_token.clone(), extension_token.clone());
        if self.cache().as_ref() == Some(&pair) {
            tracing::debug!("Auth state unchanged since last cycle");
            return Ok(SyncOutcome::Noop);
        }

        let outcome = match (&peer_credential, &extension) {
            // Peer wins on any mismatch.
            (Some(peer_credential), extension)
                if extension
                    .as_ref()
                    .map(|c| c.access_token != peer_credential.access_token)
                    .unwrap_or(true) =>
            {
                self.store.write(peer_credential)?;
                tracing::info!(user = %peer_credential.user.email, "Adopted web session");
                SyncOutcome::Adopted
            }
            (None, Some(extension_credential)) => {
                let record = WebAuthRecord::from(extension_credential);
                match self.bridge.push_credential(&record).await {
                    Ok(()) => {
                        tracing::info!(user = %record.user.email, "Pushed session to web peer");
                        SyncOutcome::Pushed
                    }
                    Err(SyncError::BridgeUnavailable) => {
                        tracing::warn!(
                            "Auth sync bridge unavailable; reload the page to resume syncing"
                        );
                        return Ok(SyncOutcome::BridgeUnavailable);
                    }
                    Err(e) => return Err(e),
                }
            }
            // Tokens equal, or both sides logged out.
            _ => SyncOutcome::Noop,
        };

        // After an adopt the extension holds the peer's token.
        let settled_extension = match outcome {
            SyncOutcome::Adopted => peer_token.clone(),
            _ => extension_token,
        };
        *self.cache() = Some((peer_token, settled_extension));

        Ok(outcome)
    }

    /// Peer-initiated logout: clear the credential regardless of prior state.
    pub async fn handle_invalid_token(&self) -> SyncResult<SyncOutcome> {
        let existed = self.store.clear()?;
        *self.cache() = None;
        tracing::info!(had_credential = existed, "Web peer reported invalid token; logged out");
        Ok(SyncOutcome::LoggedOut)
    }

    /// Extract the peer's credential from a snapshot.
    ///
    /// A token without a user is malformed observation data; it is logged
    /// and treated as unauthenticated rather than half-written.
    fn peer_credential(peer: &AuthSnapshot) -> Option<Credential> {
        match (&peer.access_token, &peer.user) {
            (Some(token), Some(user)) => Some(Credential {
                access_token: token.clone(),
                user: user.clone(),
            }),
            (Some(_), None) => {
                tracing::warn!("Peer snapshot carries a token but no user; ignoring");
                None
            }
            _ => None,
        }
    }
}
