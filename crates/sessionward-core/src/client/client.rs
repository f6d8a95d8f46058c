use std::sync::Arc;

use crate::{
    Navigator,
    auth::{CredentialStore, TokenFetcher},
    client::{ApiConfiguration, ClientSettings},
    http::{CookieInjectionMiddleware, CookieStore},
    token_management::{CredentialMiddleware, RefreshCoordinator, RefreshMiddleware},
};

/// One client context: the credential caches, the refresh state and the HTTP client that uses
/// them. Requests sent through [`SessionClient::http_client`] carry the CSRF and auth tokens and
/// recover from expired sessions on their own.
#[derive(Clone)]
pub struct SessionClient {
    // Clones share the same context; every piece of mutable state lives behind this Arc.
    internal: Arc<InternalClient>,
}

struct InternalClient {
    settings: ClientSettings,
    credentials: Arc<CredentialStore>,
    token_fetcher: Arc<TokenFetcher>,
    refresh_coordinator: Arc<RefreshCoordinator>,
    navigator: Arc<dyn Navigator>,
    api: ApiConfiguration,
}

impl SessionClient {
    /// Create a new client context reading cookies from `cookie_store` and navigating through
    /// `navigator` when the session is lost.
    pub fn new(
        settings: Option<ClientSettings>,
        cookie_store: Arc<dyn CookieStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let settings = settings.unwrap_or_default();

        let http_client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .expect("HTTP Client build should not fail");

        let credentials = Arc::new(CredentialStore::new(
            cookie_store.clone(),
            settings.csrf_cookie_name.clone(),
        ));

        // Token endpoints only get cookies attached, so fetching a token never re-enters the
        // credential or refresh middleware.
        let auth_api = ApiConfiguration {
            base_path: settings.base_url.clone(),
            client: reqwest_middleware::ClientBuilder::new(http_client.clone())
                .with(CookieInjectionMiddleware::new(cookie_store.clone()))
                .build(),
        };

        let token_fetcher = Arc::new(TokenFetcher::new(credentials.clone(), auth_api.clone()));
        let refresh_coordinator = Arc::new(RefreshCoordinator::new(
            credentials.clone(),
            auth_api,
            navigator.clone(),
            settings.login_path.clone(),
        ));

        let client = reqwest_middleware::ClientBuilder::new(http_client)
            .with(RefreshMiddleware::new(refresh_coordinator.clone()))
            .with(CredentialMiddleware::new(
                credentials.clone(),
                token_fetcher.clone(),
                settings.token_retry_delay(),
            ))
            .with(CookieInjectionMiddleware::new(cookie_store))
            .build();

        let api = ApiConfiguration {
            base_path: settings.base_url.clone(),
            client,
        };

        Self {
            internal: Arc::new(InternalClient {
                settings,
                credentials,
                token_fetcher,
                refresh_coordinator,
                navigator,
                api,
            }),
        }
    }

    /// Settings the client was created with.
    pub fn settings(&self) -> &ClientSettings {
        &self.internal.settings
    }

    /// HTTP client that attaches credentials and recovers expired sessions.
    pub fn http_client(&self) -> &reqwest_middleware::ClientWithMiddleware {
        &self.internal.api.client
    }

    /// Absolute url for `path` on the configured backend.
    pub fn url(&self, path: &str) -> String {
        self.internal.api.url(path)
    }

    /// The context's credential caches.
    pub fn credentials(&self) -> &CredentialStore {
        &self.internal.credentials
    }

    /// The context's refresh coordinator.
    pub fn refresh_coordinator(&self) -> &RefreshCoordinator {
        &self.internal.refresh_coordinator
    }

    /// Returns the auth token, fetching it with the configured retry delay if needed. `None`
    /// means unauthenticated.
    pub async fn get_auth_token(&self) -> Option<String> {
        self.internal
            .token_fetcher
            .get_auth_token(self.internal.settings.token_retry_delay())
            .await
    }

    pub(crate) fn api(&self) -> &ApiConfiguration {
        &self.internal.api
    }

    pub(crate) fn redirect_to_login(&self) {
        self.internal
            .navigator
            .redirect(&self.internal.settings.login_path);
    }
}
