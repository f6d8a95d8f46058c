use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{Cookie, CookieError, CookieStore};

/// In-memory cookie jar. Cookies live as long as the store does.
#[derive(Default)]
pub struct InMemoryCookieStore {
    cookies: RwLock<HashMap<String, Cookie>>,
}

impl InMemoryCookieStore {
    /// Creates a new empty in-memory cookie store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled from a `document.cookie` style string.
    pub fn from_cookie_header(header: &str) -> Result<Self, CookieError> {
        let cookies = Cookie::parse_header(header)?
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        Ok(Self {
            cookies: RwLock::new(cookies),
        })
    }
}

#[async_trait::async_trait]
impl CookieStore for InMemoryCookieStore {
    async fn get_cookie(&self, name: &str) -> Result<Option<Cookie>, CookieError> {
        let cookies = self.cookies.read().await;
        Ok(cookies.get(name).filter(|c| !c.is_expired()).cloned())
    }

    async fn set_cookie(&self, cookie: Cookie) -> Result<(), CookieError> {
        if cookie.name.is_empty() {
            return Err(CookieError::InvalidCookie(
                "cookie name must not be empty".to_string(),
            ));
        }

        let mut cookies = self.cookies.write().await;
        cookies.insert(cookie.name.clone(), cookie);
        Ok(())
    }

    async fn remove_cookie(&self, name: &str) -> Result<(), CookieError> {
        let mut cookies = self.cookies.write().await;
        cookies.remove(name);
        Ok(())
    }

    async fn list_cookies(&self) -> Result<Vec<Cookie>, CookieError> {
        let cookies = self.cookies.read().await;
        let mut live: Vec<Cookie> = cookies
            .values()
            .filter(|c| !c.is_expired())
            .cloned()
            .collect();
        live.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(live)
    }
}
