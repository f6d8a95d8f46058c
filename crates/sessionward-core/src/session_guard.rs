//! Gate that validates the current session before protected content is shown.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::{SessionClient, auth::api::CheckSessionRequest};

/// What the guard currently believes about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The check has not completed yet.
    Loading,
    /// `/account/check-auth` accepted the token.
    Authenticated,
    /// No token could be obtained or the check was rejected.
    Unauthenticated,
}

/// Verifies the session once on activation and publishes the outcome.
///
/// An [`Unauthenticated`](SessionStatus::Unauthenticated) outcome also redirects to the login
/// path. After [`SessionGuard::deactivate`] any late outcome is dropped without touching the
/// status or navigating.
pub struct SessionGuard {
    client: SessionClient,
    status: watch::Sender<SessionStatus>,
    active: AtomicBool,
}

impl SessionGuard {
    /// Create an active guard in the [`Loading`](SessionStatus::Loading) state.
    pub fn new(client: SessionClient) -> Self {
        let (status, _) = watch::channel(SessionStatus::Loading);
        Self {
            client,
            status,
            active: AtomicBool::new(true),
        }
    }

    /// Current status.
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Receiver notified on every status change.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Stop reacting to outcomes of checks still in flight.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// Runs the session check: fetch the auth token, then present it to `/account/check-auth`.
    /// Returns the status after the check.
    pub async fn activate(&self) -> SessionStatus {
        let outcome = self.check().await;

        if !self.active.load(Ordering::SeqCst) {
            tracing::debug!(?outcome, "Session guard deactivated, ignoring check result");
            return self.status();
        }

        self.status.send_replace(outcome);
        if outcome == SessionStatus::Unauthenticated {
            self.client.redirect_to_login();
        }
        outcome
    }

    async fn check(&self) -> SessionStatus {
        let Some(token) = self.client.get_auth_token().await else {
            tracing::warn!("No auth token available, session is not authenticated");
            return SessionStatus::Unauthenticated;
        };

        match CheckSessionRequest::new(&token).send(self.client.api()).await {
            Ok(()) => SessionStatus::Authenticated,
            Err(e) => {
                tracing::warn!("Session check failed: {e}");
                SessionStatus::Unauthenticated
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    use super::*;
    use crate::token_management::test_utils::*;

    async fn mount_check(server: &MockServer, response: ResponseTemplate) {
        Mock::given(matchers::method("GET"))
            .and(matchers::path("/account/check-auth"))
            .and(matchers::header("Authorization", "Bearer T1"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_valid_session_is_authenticated() {
        let server = start_token_server("T1").await;
        mount_check(&server, ResponseTemplate::new(200)).await;
        let (client, navigator) = session_client(&server.uri(), "XSRF-TOKEN=abc123");

        let guard = SessionGuard::new(client);
        let mut updates = guard.subscribe();
        assert_eq!(guard.status(), SessionStatus::Loading);

        assert_eq!(guard.activate().await, SessionStatus::Authenticated);
        assert_eq!(guard.status(), SessionStatus::Authenticated);
        assert!(updates.has_changed().unwrap());
        assert_eq!(*updates.borrow_and_update(), SessionStatus::Authenticated);
        assert!(navigator.visited().is_empty());
    }

    #[tokio::test]
    async fn test_missing_token_redirects_to_login() {
        let server = MockServer::start().await;
        Mock::given(matchers::path("/auth/get-token"))
            .respond_with(ResponseTemplate::new(401))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(matchers::path("/account/check-auth"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        let (client, navigator) = session_client(&server.uri(), "");

        let guard = SessionGuard::new(client);

        assert_eq!(guard.activate().await, SessionStatus::Unauthenticated);
        assert_eq!(navigator.visited(), vec!["/login"]);
    }

    #[tokio::test]
    async fn test_rejected_check_redirects_to_login() {
        let server = start_token_server("T1").await;
        mount_check(&server, ResponseTemplate::new(403)).await;
        let (client, navigator) = session_client(&server.uri(), "");

        let guard = SessionGuard::new(client);

        assert_eq!(guard.activate().await, SessionStatus::Unauthenticated);
        assert_eq!(guard.status(), SessionStatus::Unauthenticated);
        assert_eq!(navigator.visited(), vec!["/login"]);
    }

    #[tokio::test]
    async fn test_deactivated_guard_ignores_late_result() {
        let server = start_token_server("T1").await;
        mount_check(
            &server,
            ResponseTemplate::new(403).set_delay(Duration::from_millis(200)),
        )
        .await;
        let (client, navigator) = session_client(&server.uri(), "");

        let guard = SessionGuard::new(client);
        let (status, _) = tokio::join!(guard.activate(), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            guard.deactivate();
        });

        assert_eq!(status, SessionStatus::Loading);
        assert_eq!(guard.status(), SessionStatus::Loading);
        assert!(navigator.visited().is_empty());
    }
}
