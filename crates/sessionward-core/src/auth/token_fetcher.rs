//! Acquires the auth token from the backend with a bounded, fixed-delay retry.

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;

use super::{CredentialStore, api::GetTokenRequest};
use crate::client::ApiConfiguration;

/// Total number of attempts made against `/auth/get-token` before giving up.
pub const TOKEN_FETCH_ATTEMPTS: usize = 2;

/// Fetches the auth token from `/auth/get-token` and caches it in the [`CredentialStore`].
pub struct TokenFetcher {
    credentials: Arc<CredentialStore>,
    config: ApiConfiguration,
    // Serializes cache misses so only one fetch is in flight per context.
    fetch_lock: Mutex<()>,
}

impl TokenFetcher {
    /// `config` must not route through the credential middleware, which itself calls the
    /// fetcher.
    pub fn new(credentials: Arc<CredentialStore>, config: ApiConfiguration) -> Self {
        Self {
            credentials,
            config,
            fetch_lock: Mutex::new(()),
        }
    }

    /// Returns the auth token, fetching it when nothing is cached.
    ///
    /// A cached token is returned without touching the network. Otherwise up to
    /// [`TOKEN_FETCH_ATTEMPTS`] requests are made, `retry_delay` apart. `None` means the user is
    /// not authenticated; failures are logged rather than returned.
    pub async fn get_auth_token(&self, retry_delay: Duration) -> Option<String> {
        if let Some(token) = self.credentials.auth_token() {
            return Some(token);
        }

        let _guard = self.fetch_lock.lock().await;

        // Another caller may have filled the cache while we waited for the lock.
        if let Some(token) = self.credentials.auth_token() {
            tracing::debug!("Auth token fetched by a concurrent caller");
            return Some(token);
        }

        let csrf_token = match self.credentials.csrf_token().await {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Failed to read CSRF token, fetching without it: {e}");
                None
            }
        };
        let request = GetTokenRequest::new(csrf_token.as_deref());

        for attempt in 1..=TOKEN_FETCH_ATTEMPTS {
            match request.send(&self.config).await {
                Ok(token) => {
                    self.credentials.set_auth_token(token.clone());
                    return Some(token);
                }
                Err(e) => {
                    tracing::warn!(attempt, "Failed to fetch auth token: {e}");
                }
            }

            if attempt < TOKEN_FETCH_ATTEMPTS {
                tokio::time::sleep(retry_delay).await;
            }
        }

        tracing::error!(
            attempts = TOKEN_FETCH_ATTEMPTS,
            "Giving up on fetching the auth token"
        );
        None
    }
}
