//! Credential caching and auth token acquisition.

pub(crate) mod api;
mod credential_store;
mod token_fetcher;

pub use api::CSRF_HEADER;
pub use credential_store::CredentialStore;
pub use token_fetcher::{TOKEN_FETCH_ATTEMPTS, TokenFetcher};
