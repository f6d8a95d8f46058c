//! Single-flight recovery of expired sessions.
//!
//! A response with status [`SESSION_EXPIRED_STATUS`] makes the [`RefreshMiddleware`] ask the
//! [`RefreshCoordinator`] for a new token. The first caller performs the refresh; callers arriving
//! while it is in flight are queued and receive the same outcome once it is known, in the order
//! they arrived. Each affected request is then replayed once with the new token.

use std::sync::{Arc, Mutex};

use reqwest_middleware::{Middleware, Next};
use tokio::sync::oneshot;

use super::set_bearer;
use crate::{
    Navigator,
    auth::{CredentialStore, api::RefreshTokenRequest},
    client::ApiConfiguration,
    error::RefreshError,
};

/// Response status signalling that the session token has expired.
pub const SESSION_EXPIRED_STATUS: u16 = 498;

/// Request extension marking a request that has already been replayed after a refresh. Such a
/// request never triggers another refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct Retried;

/// Request extension recording the auth token a request went out with, if any.
#[derive(Debug, Clone)]
pub(crate) struct SentToken(pub(crate) Option<String>);

type RefreshResult = Result<String, RefreshError>;

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    // Only non-empty while `refreshing` is set.
    pending: Vec<oneshot::Sender<RefreshResult>>,
}

enum Role {
    Leader,
    Follower(oneshot::Receiver<RefreshResult>),
}

/// Coordinates token refreshes so at most one refresh request is in flight at a time.
pub struct RefreshCoordinator {
    credentials: Arc<CredentialStore>,
    config: ApiConfiguration,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    state: Mutex<RefreshState>,
}

impl RefreshCoordinator {
    /// `config` is used for `POST /auth/refresh-token` and must not route through the
    /// [`RefreshMiddleware`].
    pub fn new(
        credentials: Arc<CredentialStore>,
        config: ApiConfiguration,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            config,
            navigator,
            login_path: login_path.into(),
            state: Mutex::new(RefreshState::default()),
        }
    }

    /// Whether a refresh is currently in flight.
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().expect("Mutex is not poisoned").refreshing
    }

    /// Obtains a new auth token, joining the in-flight refresh if there is one.
    ///
    /// On success the token is cached in the [`CredentialStore`] so every later request carries
    /// it. On failure every waiting caller receives the error and the navigator is sent to the
    /// login path, once per failed refresh.
    pub async fn refresh(&self) -> RefreshResult {
        let role = {
            let mut state = self.state.lock().expect("Mutex is not poisoned");
            if state.refreshing {
                let (tx, rx) = oneshot::channel();
                state.pending.push(tx);
                Role::Follower(rx)
            } else {
                state.refreshing = true;
                Role::Leader
            }
        };

        match role {
            Role::Follower(rx) => {
                tracing::debug!("Waiting for in-flight token refresh");
                rx.await.unwrap_or(Err(RefreshError::Abandoned))
            }
            Role::Leader => {
                let cycle = RefreshCycle {
                    coordinator: self,
                    settled: false,
                };

                let result = RefreshTokenRequest
                    .send(&self.config)
                    .await
                    .map_err(RefreshError::from);

                match &result {
                    Ok(token) => self.credentials.set_auth_token(token.clone()),
                    Err(e) => tracing::error!("Token refresh failed: {e}"),
                }
                cycle.settle(&result);

                if result.is_err() {
                    self.navigator.redirect(&self.login_path);
                }
                result
            }
        }
    }

    /// Obtains a token to replace `expired`, the token a rejected request was sent with.
    ///
    /// A request sent before a refresh may be rejected after that refresh has completed. The
    /// cached token then no longer matches `expired` and is returned without refreshing again.
    pub async fn refresh_expired(&self, expired: Option<&str>) -> RefreshResult {
        match self.credentials.auth_token() {
            Some(current) if expired != Some(current.as_str()) => {
                tracing::debug!("Session token already refreshed, reusing it");
                Ok(current)
            }
            _ => self.refresh().await,
        }
    }

    /// Returns to idle and hands `result` to every queued caller, oldest first.
    fn finish(&self, result: &RefreshResult) {
        let pending = {
            let mut state = self.state.lock().expect("Mutex is not poisoned");
            state.refreshing = false;
            std::mem::take(&mut state.pending)
        };

        if !pending.is_empty() {
            tracing::debug!(queued = pending.len(), "Releasing requests queued on refresh");
        }
        for waiter in pending {
            // The waiting request may have been dropped in the meantime.
            _ = waiter.send(result.clone());
        }
    }
}

/// Returns the coordinator to idle when the leading refresh ends, even if its future is dropped
/// before completing.
struct RefreshCycle<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshCycle<'_> {
    fn settle(mut self, result: &RefreshResult) {
        self.settled = true;
        self.coordinator.finish(result);
    }
}

impl Drop for RefreshCycle<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("Token refresh dropped before completing");
            self.coordinator.finish(&Err(RefreshError::Abandoned));
        }
    }
}

/// Response stage: replays requests that failed with [`SESSION_EXPIRED_STATUS`] after a
/// coordinated token refresh.
///
/// Must sit in front of the [`CredentialMiddleware`](super::CredentialMiddleware) so replays pass
/// through it again. A replay differs from the original request only in its `Authorization`
/// header and carries the [`Retried`] marker.
pub struct RefreshMiddleware {
    coordinator: Arc<RefreshCoordinator>,
}

impl RefreshMiddleware {
    /// Create a middleware refreshing through `coordinator`.
    pub fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self { coordinator }
    }
}

#[async_trait::async_trait]
impl Middleware for RefreshMiddleware {
    async fn handle(
        &self,
        req: reqwest::Request,
        ext: &mut http::Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let replay = req.try_clone();
        let response = next.clone().run(req, ext).await?;

        if response.status().as_u16() != SESSION_EXPIRED_STATUS || ext.get::<Retried>().is_some() {
            return Ok(response);
        }

        let Some(mut replay) = replay else {
            tracing::warn!(
                url = %response.url(),
                "Session expired but the request body cannot be replayed"
            );
            return Ok(response);
        };

        let expired = ext.get::<SentToken>().and_then(|sent| sent.0.clone());
        let token = self
            .coordinator
            .refresh_expired(expired.as_deref())
            .await
            .map_err(reqwest_middleware::Error::middleware)?;

        ext.insert(Retried);
        set_bearer(replay.headers_mut(), &token);
        tracing::debug!(url = %replay.url(), "Replaying request after token refresh");

        next.run(replay, ext).await
    }
}
