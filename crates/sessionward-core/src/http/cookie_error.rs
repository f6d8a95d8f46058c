/// Errors that can occur while reading or writing the cookie jar.
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    /// Cookie storage backend operation failed
    #[error("Cookie storage operation failed: {0}")]
    StorageFailure(String),

    /// Cookie has invalid format or attributes
    #[error("Invalid cookie format or attributes: {0}")]
    InvalidCookie(String),
}
