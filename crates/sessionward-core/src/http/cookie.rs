use std::time::SystemTime;

use super::CookieError;

/// A cookie as seen by the page: a name/value pair plus the attributes that decide whether
/// it is still live and whether script code may read it.
#[derive(Clone, Debug, PartialEq)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value, stored exactly as received (still percent-encoded)
    pub value: String,
    /// Cookie path
    pub path: Option<String>,
    /// Cookie expiration timestamp
    pub expires: Option<SystemTime>,
    /// Secure attribute (HTTPS-only)
    pub secure: bool,
    /// HttpOnly attribute, hides the cookie from script access
    pub http_only: bool,
}

impl Cookie {
    /// Creates a session cookie scoped to `/`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: Some("/".to_string()),
            expires: None,
            secure: false,
            http_only: false,
        }
    }

    /// Parses a `document.cookie` style string (`a=1; b=2`) into cookies.
    ///
    /// Empty segments are skipped. A segment without `=` or with an empty name is rejected.
    pub fn parse_header(header: &str) -> Result<Vec<Cookie>, CookieError> {
        header
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => {
                    Ok(Cookie::new(name.trim(), value.trim()))
                }
                _ => Err(CookieError::InvalidCookie(pair.to_string())),
            })
            .collect()
    }

    /// Returns true if the cookie has expired (past its expiration timestamp).
    pub fn is_expired(&self) -> bool {
        self.expires.is_some_and(|exp| SystemTime::now() > exp)
    }

    /// Formats cookie as "name=value" for HTTP Cookie header injection.
    pub fn to_cookie_header(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}
