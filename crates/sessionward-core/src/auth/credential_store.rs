//! In-memory cache for the CSRF token and the auth token of one client context.

use std::sync::{Arc, RwLock};

use percent_encoding::percent_decode_str;
use tokio::sync::Mutex;

use crate::http::{CookieError, CookieStore};

/// Holds the CSRF token (read lazily from the cookie jar) and the auth token (filled in by the
/// [`TokenFetcher`](crate::auth::TokenFetcher) and the refresh coordinator).
///
/// Neither token is ever persisted. Once read, the CSRF token is kept for the lifetime of the
/// store and the cookie is not consulted again.
pub struct CredentialStore {
    cookie_store: Arc<dyn CookieStore>,
    csrf_cookie_name: String,

    // Held across the cookie read so that concurrent first callers read the cookie once.
    csrf_token: Mutex<Option<String>>,
    auth_token: RwLock<Option<String>>,
}

impl CredentialStore {
    /// Create a store reading the CSRF token from the cookie called `csrf_cookie_name`.
    pub fn new(cookie_store: Arc<dyn CookieStore>, csrf_cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_store,
            csrf_cookie_name: csrf_cookie_name.into(),
            csrf_token: Mutex::new(None),
            auth_token: RwLock::new(None),
        }
    }

    /// Returns the CSRF token, reading and percent-decoding the cookie on first use.
    ///
    /// A missing cookie is not an error: it is logged and `None` is returned, and the cookie is
    /// looked up again on the next call.
    pub async fn csrf_token(&self) -> Result<Option<String>, CookieError> {
        let mut cached = self.csrf_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(Some(token.clone()));
        }

        let Some(cookie) = self.cookie_store.get_cookie(&self.csrf_cookie_name).await? else {
            tracing::warn!(
                cookie_name = %self.csrf_cookie_name,
                "CSRF cookie not found"
            );
            return Ok(None);
        };

        let token = percent_decode_str(&cookie.value)
            .decode_utf8_lossy()
            .into_owned();
        *cached = Some(token.clone());
        Ok(Some(token))
    }

    /// Returns the cached auth token, if any.
    pub fn auth_token(&self) -> Option<String> {
        self.auth_token
            .read()
            .expect("RwLock is not poisoned")
            .clone()
    }

    /// Replaces the cached auth token. Every request sent afterwards carries it.
    pub fn set_auth_token(&self, token: String) {
        *self.auth_token.write().expect("RwLock is not poisoned") = Some(token);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{
        http::{Cookie, InMemoryCookieStore},
        token_management::test_utils::FailingCookieStore,
    };

    /// Cookie store counting how often a cookie is looked up.
    #[derive(Default)]
    struct CountingCookieStore {
        inner: InMemoryCookieStore,
        reads: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CookieStore for CountingCookieStore {
        async fn get_cookie(&self, name: &str) -> Result<Option<Cookie>, CookieError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get_cookie(name).await
        }

        async fn set_cookie(&self, cookie: Cookie) -> Result<(), CookieError> {
            self.inner.set_cookie(cookie).await
        }

        async fn remove_cookie(&self, name: &str) -> Result<(), CookieError> {
            self.inner.remove_cookie(name).await
        }

        async fn list_cookies(&self) -> Result<Vec<Cookie>, CookieError> {
            self.inner.list_cookies().await
        }
    }

    #[tokio::test]
    async fn test_csrf_cookie_is_read_once() {
        let cookies = Arc::new(CountingCookieStore::default());
        cookies
            .set_cookie(Cookie::new("XSRF-TOKEN", "abc123"))
            .await
            .unwrap();
        let store = CredentialStore::new(cookies.clone(), "XSRF-TOKEN");

        assert_eq!(store.csrf_token().await.unwrap().as_deref(), Some("abc123"));
        assert_eq!(store.csrf_token().await.unwrap().as_deref(), Some("abc123"));

        // The cached value wins even if the cookie changes afterwards.
        cookies
            .set_cookie(Cookie::new("XSRF-TOKEN", "rotated"))
            .await
            .unwrap();
        assert_eq!(store.csrf_token().await.unwrap().as_deref(), Some("abc123"));

        assert_eq!(cookies.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_reads_hit_cookie_once() {
        let cookies = Arc::new(CountingCookieStore::default());
        cookies
            .set_cookie(Cookie::new("XSRF-TOKEN", "abc123"))
            .await
            .unwrap();
        let store = CredentialStore::new(cookies.clone(), "XSRF-TOKEN");

        let (a, b, c) = tokio::join!(store.csrf_token(), store.csrf_token(), store.csrf_token());
        for token in [a, b, c] {
            assert_eq!(token.unwrap().as_deref(), Some("abc123"));
        }
        assert_eq!(cookies.reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_csrf_cookie_is_percent_decoded() {
        let cookies = Arc::new(InMemoryCookieStore::new());
        cookies
            .set_cookie(Cookie::new("XSRF-TOKEN", "a%2Fb%3D%3D"))
            .await
            .unwrap();
        let store = CredentialStore::new(cookies, "XSRF-TOKEN");

        assert_eq!(store.csrf_token().await.unwrap().as_deref(), Some("a/b=="));
    }

    #[tokio::test]
    async fn test_missing_cookie_is_not_cached() {
        let cookies = Arc::new(CountingCookieStore::default());
        let store = CredentialStore::new(cookies.clone(), "XSRF-TOKEN");

        assert_eq!(store.csrf_token().await.unwrap(), None);

        cookies
            .set_cookie(Cookie::new("XSRF-TOKEN", "late"))
            .await
            .unwrap();
        assert_eq!(store.csrf_token().await.unwrap().as_deref(), Some("late"));
        assert_eq!(cookies.reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cookie_store_errors_propagate() {
        let store = CredentialStore::new(Arc::new(FailingCookieStore), "XSRF-TOKEN");
        assert!(matches!(
            store.csrf_token().await,
            Err(CookieError::StorageFailure(_))
        ));
    }

    #[test]
    fn test_auth_token_roundtrip() {
        let store = CredentialStore::new(Arc::new(InMemoryCookieStore::new()), "XSRF-TOKEN");
        assert_eq!(store.auth_token(), None);

        store.set_auth_token("T1".to_string());
        store.set_auth_token("T2".to_string());
        assert_eq!(store.auth_token().as_deref(), Some("T2"));
    }
}
