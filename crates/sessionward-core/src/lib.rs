#![doc = include_str!("../README.md")]

pub mod auth;
pub mod client;
mod error;
pub mod http;
mod navigator;
mod session_guard;
pub mod token_management;

pub use client::{ClientSettings, SessionClient};
pub use error::{FetchError, RefreshError};
pub use navigator::{Navigator, RecordingNavigator};
pub use session_guard::{SessionGuard, SessionStatus};
