use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::FetchError;

/// Body returned by both `/auth/get-token` and `/auth/refresh-token`.
#[derive(Deserialize, Debug, PartialEq)]
pub(crate) struct TokenResponse {
    pub token: String,
}

/// Maps non-success statuses to [`FetchError::Response`] and decodes the token body.
pub(crate) async fn parse_token_response(
    response: reqwest::Response,
) -> Result<String, FetchError> {
    let response = require_success(response)?;
    let body: TokenResponse = response.json().await?;
    Ok(body.token)
}

pub(crate) fn require_success(response: reqwest::Response) -> Result<reqwest::Response, FetchError> {
    let status: StatusCode = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::Response { status })
    }
}
