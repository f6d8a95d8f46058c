use super::{Cookie, CookieError};

/// Abstraction over the cookie jar of the current execution context.
///
/// In a browser this is `document.cookie`, natively it is whatever jar the embedding
/// application keeps. Methods are async so backends may do I/O.
#[async_trait::async_trait]
pub trait CookieStore: Send + Sync {
    /// Retrieves a cookie by name.
    ///
    /// Returns None if cookie not found or expired.
    async fn get_cookie(&self, name: &str) -> Result<Option<Cookie>, CookieError>;

    /// Stores a cookie, replacing any cookie with the same name.
    async fn set_cookie(&self, cookie: Cookie) -> Result<(), CookieError>;

    /// Removes a cookie by name.
    ///
    /// Returns Ok even if cookie doesn't exist (idempotent operation).
    async fn remove_cookie(&self, name: &str) -> Result<(), CookieError>;

    /// Lists all non-expired cookies.
    async fn list_cookies(&self) -> Result<Vec<Cookie>, CookieError>;
}
