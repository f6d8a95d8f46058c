use reqwest::header;

use super::{CSRF_HEADER, parse_token_response, require_success};
use crate::{client::ApiConfiguration, error::FetchError};

/// `GET /auth/get-token`, presenting the CSRF token when one is known.
pub(crate) struct GetTokenRequest<'a> {
    csrf_token: Option<&'a str>,
}

impl<'a> GetTokenRequest<'a> {
    pub(crate) fn new(csrf_token: Option<&'a str>) -> Self {
        Self { csrf_token }
    }

    pub(crate) async fn send(&self, config: &ApiConfiguration) -> Result<String, FetchError> {
        let mut request = config
            .client
            .get(config.url("/auth/get-token"))
            .header(header::ACCEPT, "application/json");

        if let Some(csrf_token) = self.csrf_token {
            request = request.header(CSRF_HEADER, csrf_token);
        }

        parse_token_response(request.send().await?).await
    }
}

/// `POST /auth/refresh-token` with an empty body. The session cookie identifies the user.
pub(crate) struct RefreshTokenRequest;

impl RefreshTokenRequest {
    pub(crate) async fn send(&self, config: &ApiConfiguration) -> Result<String, FetchError> {
        let response = config
            .client
            .post(config.url("/auth/refresh-token"))
            .header(header::ACCEPT, "application/json")
            .body("")
            .send()
            .await?;

        parse_token_response(response).await
    }
}

/// `GET /account/check-auth`, used only to validate a session.
pub(crate) struct CheckSessionRequest<'a> {
    token: &'a str,
}

impl<'a> CheckSessionRequest<'a> {
    pub(crate) fn new(token: &'a str) -> Self {
        Self { token }
    }

    pub(crate) async fn send(&self, config: &ApiConfiguration) -> Result<(), FetchError> {
        let response = config
            .client
            .get(config.url("/account/check-auth"))
            .bearer_auth(self.token)
            .send()
            .await?;

        require_success(response)?;
        Ok(())
    }
}
