//! Async query cache for data fetching with stale-while-revalidate.
//!
//! Inspired by TanStack Query. A [`QueryClient`] owns one cache entry per
//! [`QueryKey`]; views hold [`Query<T>`] observers that read the entry, start
//! fetches on mount and trigger refetches.
//!
//! # Example
//!
//! ```ignore
//! let api = api_client.clone();
//! let mut query = Query::new(client.clone(), QueryKey::Posts, move || {
//!     let api = api.clone();
//!     async move { api.fetch_posts().await.map_err(|e| e.to_string()) }
//! });
//!
//! // Fetch if missing or stale
//! query.mount();
//!
//! // In event loop tick
//! if query.poll() {
//!     // Entry changed, trigger re-render
//! }
//!
//! // In render
//! let result = query.result();
//! if result.is_loading() { render_spinner() }
//! else if let Some(posts) = result.data() { render_posts(posts) }
//! ```

mod client;
mod key;
mod observer;
mod state;

pub use client::{retry_delay, Fetcher, QueryClient};
pub use key::QueryKey;
pub use observer::Query;
pub use state::{is_stale, QueryOptions, QueryResult, QueryStatus};
