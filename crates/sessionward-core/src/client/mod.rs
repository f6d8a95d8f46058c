//! Session client context.

mod api_configuration;
#[allow(clippy::module_inception)]
mod client;
mod client_settings;

pub use api_configuration::ApiConfiguration;
pub use client::SessionClient;
pub use client_settings::{BASE_URL_ENV, ClientSettings};
