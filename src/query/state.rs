use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Lifecycle of a cache entry.
///
/// `Idle -> Loading -> Success | Error`. Refetching an entry that already has
/// a result keeps its status and only sets `is_fetching`, so cached data
/// stays on screen while it is revalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
  /// Nothing has been requested yet
  #[default]
  Idle,
  /// First fetch in flight, no data yet
  Loading,
  /// Last fetch succeeded
  Success,
  /// Last fetch failed
  Error,
}

/// Whether data fetched at `updated_at` is stale at `now`.
///
/// Never-fetched data is always stale. A zero `stale_time` makes data stale
/// the moment it arrives.
pub fn is_stale(updated_at: Option<Instant>, now: Instant, stale_time: Duration) -> bool {
  match updated_at {
    None => true,
    Some(at) => now.saturating_duration_since(at) >= stale_time,
  }
}

/// Per-query fetch policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
  /// How long fetched data counts as fresh
  pub stale_time: Duration,
  /// Extra attempts after a failed fetch
  pub retry: u32,
  /// Upper bound for the exponential backoff between attempts
  pub retry_delay_cap: Duration,
}

impl Default for QueryOptions {
  fn default() -> Self {
    Self {
      stale_time: Duration::ZERO,
      retry: 0,
      retry_delay_cap: Duration::from_secs(30),
    }
  }
}

impl QueryOptions {
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  pub fn with_retry(mut self, retry: u32) -> Self {
    self.retry = retry;
    self
  }
}

/// Snapshot of a cache entry as seen by one observer
#[derive(Debug, Clone)]
pub struct QueryResult<T> {
  pub status: QueryStatus,
  /// Last successfully fetched value, kept across later failures and refetches
  pub data: Option<Arc<T>>,
  /// Message of the last failure
  pub error: Option<String>,
  /// A fetch for this key is in flight
  pub is_fetching: bool,
  /// Wall-clock time of the last success
  pub updated_at: Option<DateTime<Local>>,
}

impl<T> Default for QueryResult<T> {
  fn default() -> Self {
    Self {
      status: QueryStatus::Idle,
      data: None,
      error: None,
      is_fetching: false,
      updated_at: None,
    }
  }
}

impl<T> QueryResult<T> {
  pub fn is_idle(&self) -> bool {
    self.status == QueryStatus::Idle
  }

  pub fn is_loading(&self) -> bool {
    self.status == QueryStatus::Loading
  }

  pub fn is_success(&self) -> bool {
    self.status == QueryStatus::Success
  }

  pub fn is_error(&self) -> bool {
    self.status == QueryStatus::Error
  }

  pub fn data(&self) -> Option<&T> {
    self.data.as_deref()
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }
}
