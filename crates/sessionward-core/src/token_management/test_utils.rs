use std::{sync::Arc, time::Duration};

use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

use crate::{
    ClientSettings, RecordingNavigator, SessionClient,
    auth::CredentialStore,
    client::ApiConfiguration,
    http::{Cookie, CookieError, CookieInjectionMiddleware, CookieStore, InMemoryCookieStore},
};

pub const NO_DELAY: Duration = Duration::ZERO;

/// Credential store backed by `cookies`, plus an endpoint configuration that sends those cookies.
pub fn auth_context(server_uri: &str, cookies: &str) -> (Arc<CredentialStore>, ApiConfiguration) {
    let cookie_store = Arc::new(InMemoryCookieStore::from_cookie_header(cookies).unwrap());
    let credentials = Arc::new(CredentialStore::new(cookie_store.clone(), "XSRF-TOKEN"));
    let config = ApiConfiguration {
        base_path: server_uri.to_string(),
        client: reqwest_middleware::ClientBuilder::new(reqwest::Client::new())
            .with(CookieInjectionMiddleware::new(cookie_store))
            .build(),
    };
    (credentials, config)
}

/// Full client against `server_uri` with no retry delay.
pub fn session_client(server_uri: &str, cookies: &str) -> (SessionClient, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::new());
    let settings = ClientSettings {
        base_url: server_uri.to_string(),
        token_retry_delay_ms: 0,
        ..Default::default()
    };
    let client = SessionClient::new(
        Some(settings),
        Arc::new(InMemoryCookieStore::from_cookie_header(cookies).unwrap()),
        navigator.clone(),
    );
    (client, navigator)
}

/// Mount `GET /auth/get-token` answering `{ "token": token }`.
pub async fn mount_token_endpoint(server: &MockServer, token: &str) {
    Mock::given(matchers::method("GET"))
        .and(matchers::path("/auth/get-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": token
        })))
        .mount(server)
        .await;
}

/// Start a mock server whose token endpoint always hands out `token`.
pub async fn start_token_server(token: &str) -> MockServer {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, token).await;
    server
}

/// Mount `GET /data`: 200 for `Bearer <valid>`, 498 for anything else.
pub async fn mount_protected_endpoint(server: &MockServer, valid: &str) {
    Mock::given(matchers::path("/data"))
        .and(matchers::header("Authorization", format!("Bearer {valid}").as_str()))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(1)
        .mount(server)
        .await;
    Mock::given(matchers::path("/data"))
        .respond_with(ResponseTemplate::new(498))
        .with_priority(2)
        .mount(server)
        .await;
}

/// Mount `POST /auth/refresh-token` answering with `response`, `expected` times.
pub async fn mount_refresh_endpoint(server: &MockServer, response: ResponseTemplate, expected: u64) {
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/auth/refresh-token"))
        .respond_with(response)
        .expect(expected)
        .mount(server)
        .await;
}

/// Requests that reached `path`, in arrival order.
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .collect()
}

pub fn authorization(request: &wiremock::Request) -> Option<String> {
    request
        .headers
        .get("Authorization")
        .map(|v| v.to_str().unwrap().to_string())
}

/// Cookie jar whose reads always fail.
pub struct FailingCookieStore;

#[async_trait::async_trait]
impl CookieStore for FailingCookieStore {
    async fn get_cookie(&self, _name: &str) -> Result<Option<Cookie>, CookieError> {
        Err(CookieError::StorageFailure("jar unavailable".to_string()))
    }

    async fn set_cookie(&self, _cookie: Cookie) -> Result<(), CookieError> {
        Err(CookieError::StorageFailure("jar unavailable".to_string()))
    }

    async fn remove_cookie(&self, _name: &str) -> Result<(), CookieError> {
        Ok(())
    }

    async fn list_cookies(&self) -> Result<Vec<Cookie>, CookieError> {
        Ok(Vec::new())
    }
}
