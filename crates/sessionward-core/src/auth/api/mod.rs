//! Requests against the backend's session endpoints.

mod request;
mod response;

pub(crate) use request::*;
pub(crate) use response::*;

/// Header carrying the CSRF token.
pub const CSRF_HEADER: &str = "X-CSRF-Token";
