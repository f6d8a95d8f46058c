//! Errors that can occur when talking to the session endpoints

use reqwest::StatusCode;
use thiserror::Error;

/// Errors from a single request against one of the token endpoints.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    ReqwestMiddleware(#[from] reqwest_middleware::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("Received error status from server: {status}")]
    Response { status: StatusCode },
}

/// A failed token refresh. Every request waiting on the refresh receives a clone of the
/// error that ended it.
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    /// The refresh endpoint answered with a non-success status.
    #[error("Refresh endpoint rejected the session: {status}")]
    Response {
        /// Status returned by the refresh endpoint.
        status: StatusCode,
    },
    /// The refresh request could not be sent or its body could not be read.
    #[error("Could not complete the refresh request: {0}")]
    Request(String),
    /// The task driving the refresh was dropped before it produced a result.
    #[error("Token refresh was abandoned before it completed")]
    Abandoned,
}

impl From<FetchError> for RefreshError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Response { status } => Self::Response { status },
            e => Self::Request(e.to_string()),
        }
    }
}
