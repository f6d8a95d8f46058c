/// Where and how to reach the session endpoints.
#[derive(Debug, Clone)]
pub struct ApiConfiguration {
    /// Base URL of the backend, e.g. `http://localhost:8080`.
    pub base_path: String,
    /// HTTP client with middleware support.
    pub client: reqwest_middleware::ClientWithMiddleware,
}

impl ApiConfiguration {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_path.trim_end_matches('/'), path)
    }
}
