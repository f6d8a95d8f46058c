use std::sync::Arc;

use http::Extensions;
use reqwest::header::{self, HeaderValue};
use reqwest_middleware::{Middleware, Next};

use super::CookieStore;

/// Sends the context's cookies with every request, the native counterpart of a browser
/// `fetch` with `credentials: "include"`.
///
/// A `Cookie` header already present on the request is left untouched.
pub struct CookieInjectionMiddleware {
    cookie_store: Arc<dyn CookieStore>,
}

impl CookieInjectionMiddleware {
    /// Creates a new cookie injection middleware with the specified store.
    pub fn new(cookie_store: Arc<dyn CookieStore>) -> Self {
        Self { cookie_store }
    }
}

#[async_trait::async_trait]
impl Middleware for CookieInjectionMiddleware {
    async fn handle(
        &self,
        mut req: reqwest::Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<reqwest::Response> {
        if !req.headers().contains_key(header::COOKIE) {
            match self.cookie_store.list_cookies().await {
                Ok(cookies) if !cookies.is_empty() => {
                    let cookie_header = cookies
                        .iter()
                        .map(|c| c.to_cookie_header())
                        .collect::<Vec<_>>()
                        .join("; ");
                    match HeaderValue::from_str(&cookie_header) {
                        Ok(value) => {
                            req.headers_mut().insert(header::COOKIE, value);
                        }
                        Err(e) => {
                            tracing::warn!("Failed to parse cookie header: {e}");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Failed to retrieve cookies from store: {e}");
                }
            }
        }

        next.run(req, extensions).await
    }
}
