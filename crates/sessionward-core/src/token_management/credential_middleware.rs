use std::{sync::Arc, time::Duration};

use reqwest::header::HeaderValue;
use reqwest_middleware::{Middleware, Next};

use super::{refresh::SentToken, set_bearer};
use crate::auth::{CSRF_HEADER, CredentialStore, TokenFetcher};

/// Request stage: decorates every outgoing request with the CSRF token and the auth token,
/// fetching either one lazily when it is not cached yet.
///
/// A missing credential is tolerated and the request goes out without that header. A failure to
/// read the cookie jar aborts the request.
pub struct CredentialMiddleware {
    credentials: Arc<CredentialStore>,
    token_fetcher: Arc<TokenFetcher>,
    retry_delay: Duration,
}

impl CredentialMiddleware {
    /// `retry_delay` is handed to [`TokenFetcher::get_auth_token`] on a cache miss.
    pub fn new(
        credentials: Arc<CredentialStore>,
        token_fetcher: Arc<TokenFetcher>,
        retry_delay: Duration,
    ) -> Self {
        Self {
            credentials,
            token_fetcher,
            retry_delay,
        }
    }
}

#[async_trait::async_trait]
impl Middleware for CredentialMiddleware {
    async fn handle(
        &self,
        mut req: reqwest::Request,
        ext: &mut http::Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        let (csrf_token, auth_token) = tokio::join!(
            self.credentials.csrf_token(),
            self.token_fetcher.get_auth_token(self.retry_delay)
        );
        let csrf_token = csrf_token.map_err(reqwest_middleware::Error::middleware)?;

        if let Some(csrf_token) = csrf_token {
            match HeaderValue::from_str(&csrf_token) {
                Ok(header_value) => {
                    req.headers_mut().insert(CSRF_HEADER, header_value);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse CSRF token for header: {e}");
                }
            }
        }

        match &auth_token {
            Some(token) => set_bearer(req.headers_mut(), token),
            None => {
                tracing::debug!(url = %req.url(), "No auth token available, sending request without it");
            }
        }
        ext.insert(SentToken(auth_token));

        next.run(req, ext).await
    }
}
