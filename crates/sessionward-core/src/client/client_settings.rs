use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ClientSettings::base_url`] in [`ClientSettings::from_env`].
pub const BASE_URL_ENV: &str = "SESSIONWARD_BASE_URL";

/// Basic client behavior settings. They are fixed once the [`SessionClient`](crate::SessionClient)
/// is created.
///
/// Defaults to
///
/// ```
/// # use sessionward_core::ClientSettings;
/// let settings = ClientSettings {
///     base_url: "http://localhost:8080".to_string(),
///     csrf_cookie_name: "XSRF-TOKEN".to_string(),
///     login_path: "/login".to_string(),
///     request_timeout_ms: 5000,
///     token_retry_delay_ms: 1000,
/// };
/// let default = ClientSettings::default();
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientSettings {
    /// Backend base url, without a trailing slash. Defaults to `http://localhost:8080`
    pub base_url: String,
    /// Name of the cookie holding the CSRF token. Defaults to `XSRF-TOKEN`
    pub csrf_cookie_name: String,
    /// Path navigated to when the session cannot be recovered. Defaults to `/login`
    pub login_path: String,
    /// Wall-clock timeout applied to every request. Defaults to 5000
    pub request_timeout_ms: u64,
    /// Fixed delay between the two token fetch attempts. Defaults to 1000
    pub token_retry_delay_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            csrf_cookie_name: "XSRF-TOKEN".into(),
            login_path: "/login".into(),
            request_timeout_ms: 5000,
            token_retry_delay_ms: 1000,
        }
    }
}

impl ClientSettings {
    /// Default settings with the base url taken from `SESSIONWARD_BASE_URL`, if set. A `.env`
    /// file in the working directory is loaded first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::default().with_base_url(std::env::var(BASE_URL_ENV).ok())
    }

    /// Replaces the base url unless `base_url` is absent or blank.
    fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(base_url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = base_url;
        }
        self
    }

    pub(crate) fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub(crate) fn token_retry_delay(&self) -> Duration {
        Duration::from_millis(self.token_retry_delay_ms)
    }
}
