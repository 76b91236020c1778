//! HTTP client for the remote JSON endpoints the screens display.

pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::ApiClient;
pub use error::FetchError;
pub use types::{Post, User};
