//! Middleware that attaches credentials to requests and recovers expired sessions.

mod credential_middleware;
mod refresh;
#[cfg(test)]
pub(crate) mod test_utils;

pub use credential_middleware::CredentialMiddleware;
pub use refresh::{RefreshCoordinator, RefreshMiddleware, Retried, SESSION_EXPIRED_STATUS};

/// Sets `Authorization: Bearer <token>`, replacing any previous value. A token that is not a
/// valid header value is logged and left out.
pub(crate) fn set_bearer(headers: &mut reqwest::header::HeaderMap, token: &str) {
    match format!("Bearer {}", token).parse() {
        Ok(header_value) => {
            headers.insert(http::header::AUTHORIZATION, header_value);
        }
        Err(e) => {
            tracing::warn!("Failed to parse auth token for header: {e}");
        }
    }
}
