use chrono::{DateTime, Local};
use futures::future::BoxFuture;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::key::QueryKey;
use super::state::{is_stale, QueryOptions, QueryResult, QueryStatus};

/// A factory producing one fetch attempt per call
pub type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

type Erased = Arc<dyn Any + Send + Sync>;

/// Fetch currently running for an entry
struct InFlight {
  id: u64,
  abort: AbortHandle,
}

struct Entry {
  status: QueryStatus,
  data: Option<Erased>,
  error: Option<String>,
  in_flight: Option<InFlight>,
  /// Monotonic time of the last success, drives staleness
  updated_at: Option<Instant>,
  /// Wall-clock time of the last success, for display
  updated_wall: Option<DateTime<Local>>,
  invalidated: bool,
  observers: usize,
  /// Set whenever the observer count drops to zero
  unobserved_since: Option<Instant>,
  version: u64,
}

impl Entry {
  fn new() -> Self {
    Self {
      status: QueryStatus::Idle,
      data: None,
      error: None,
      in_flight: None,
      updated_at: None,
      updated_wall: None,
      invalidated: false,
      observers: 0,
      unobserved_since: Some(Instant::now()),
      version: 0,
    }
  }
}

#[derive(Default)]
struct Inner {
  entries: HashMap<QueryKey, Entry>,
  next_fetch_id: u64,
}

/// Shared query cache.
///
/// Clones share the same entries. The lock is never held across an await:
/// fetches run on spawned tasks and write their result back when done.
#[derive(Clone, Default)]
pub struct QueryClient {
  inner: Arc<Mutex<Inner>>,
  defaults: QueryOptions,
}

impl QueryClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a client whose observers start from `defaults`.
  pub fn with_defaults(defaults: QueryOptions) -> Self {
    Self {
      inner: Arc::default(),
      defaults,
    }
  }

  pub fn default_options(&self) -> &QueryOptions {
    &self.defaults
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Start a fetch for `key` unless one is already in flight.
  pub fn fetch<T>(&self, key: &QueryKey, fetcher: &Fetcher<T>, options: &QueryOptions)
  where
    T: Send + Sync + 'static,
  {
    let mut inner = self.lock();
    if let Some(entry) = inner.entries.get(key) {
      if entry.in_flight.is_some() {
        debug!(%key, "fetch already in flight");
        return;
      }
    }
    self.start_fetch(&mut inner, key, fetcher, options);
  }

  /// Abort any in-flight fetch for `key` and start a new one.
  ///
  /// Previously cached data stays readable until the new result arrives.
  pub fn refetch<T>(&self, key: &QueryKey, fetcher: &Fetcher<T>, options: &QueryOptions)
  where
    T: Send + Sync + 'static,
  {
    let mut inner = self.lock();
    if let Some(pending) = inner
      .entries
      .get_mut(key)
      .and_then(|entry| entry.in_flight.take())
    {
      debug!(%key, fetch = pending.id, "cancelling superseded fetch");
      pending.abort.abort();
    }
    self.start_fetch(&mut inner, key, fetcher, options);
  }

  /// Fetch when the entry is missing, invalidated or stale.
  ///
  /// Returns whether a fetch was started.
  pub fn ensure<T>(&self, key: &QueryKey, fetcher: &Fetcher<T>, options: &QueryOptions) -> bool
  where
    T: Send + Sync + 'static,
  {
    let mut inner = self.lock();
    let needed = match inner.entries.get(key) {
      None => true,
      Some(entry) => {
        entry.in_flight.is_none()
          && (entry.invalidated || is_stale(entry.updated_at, Instant::now(), options.stale_time))
      }
    };

    if needed {
      self.start_fetch(&mut inner, key, fetcher, options);
    } else {
      debug!(%key, "serving cached entry");
    }
    needed
  }

  /// Read the current state of `key` as type `T`.
  ///
  /// Data stored under the key with a different type reads as absent.
  pub fn snapshot<T>(&self, key: &QueryKey) -> QueryResult<T>
  where
    T: Send + Sync + 'static,
  {
    let inner = self.lock();
    match inner.entries.get(key) {
      None => QueryResult::default(),
      Some(entry) => QueryResult {
        status: entry.status,
        data: entry
          .data
          .clone()
          .and_then(|data| data.downcast::<T>().ok()),
        error: entry.error.clone(),
        is_fetching: entry.in_flight.is_some(),
        updated_at: entry.updated_wall,
      },
    }
  }

  /// Whether the data under `key` is stale for the given stale time
  pub fn is_stale(&self, key: &QueryKey, stale_time: Duration) -> bool {
    let inner = self.lock();
    inner.entries.get(key).map_or(true, |entry| {
      entry.invalidated || is_stale(entry.updated_at, Instant::now(), stale_time)
    })
  }

  /// Mark `key` stale so the next `ensure` refetches it.
  pub fn invalidate(&self, key: &QueryKey) {
    let mut inner = self.lock();
    if let Some(entry) = inner.entries.get_mut(key) {
      entry.invalidated = true;
      entry.version += 1;
    }
  }

  /// Change counter for `key`; bumps on every status, data or fetch change.
  pub fn version(&self, key: &QueryKey) -> u64 {
    let inner = self.lock();
    inner.entries.get(key).map_or(0, |entry| entry.version)
  }

  pub fn contains(&self, key: &QueryKey) -> bool {
    self.lock().entries.contains_key(key)
  }

  pub fn len(&self) -> usize {
    self.lock().entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub(crate) fn observe(&self, key: &QueryKey) {
    let mut inner = self.lock();
    let entry = inner.entries.entry(key.clone()).or_insert_with(Entry::new);
    entry.observers += 1;
    entry.unobserved_since = None;
  }

  pub(crate) fn unobserve(&self, key: &QueryKey) {
    let mut inner = self.lock();
    if let Some(entry) = inner.entries.get_mut(key) {
      entry.observers = entry.observers.saturating_sub(1);
      if entry.observers == 0 {
        entry.unobserved_since = Some(Instant::now());
      }
    }
  }

  /// Evict entries nobody has observed for at least `gc_time`.
  ///
  /// Entries with a fetch in flight are kept. Returns the number evicted.
  pub fn collect_garbage(&self, gc_time: Duration) -> usize {
    let now = Instant::now();
    let mut inner = self.lock();
    let before = inner.entries.len();
    inner.entries.retain(|key, entry| {
      let expired = entry.observers == 0
        && entry.in_flight.is_none()
        && entry
          .unobserved_since
          .is_some_and(|since| now.saturating_duration_since(since) >= gc_time);
      if expired {
        debug!(%key, "evicting unobserved entry");
      }
      !expired
    });
    before - inner.entries.len()
  }

  fn start_fetch<T>(
    &self,
    inner: &mut Inner,
    key: &QueryKey,
    fetcher: &Fetcher<T>,
    options: &QueryOptions,
  ) where
    T: Send + Sync + 'static,
  {
    inner.next_fetch_id += 1;
    let id = inner.next_fetch_id;

    let client = self.clone();
    let task_key = key.clone();
    let fetcher = Arc::clone(fetcher);
    let options = options.clone();
    // The task cannot observe the entry before this function returns: it has
    // to take the lock we are holding.
    let handle = tokio::spawn(async move {
      let result = run_with_retry(&task_key, &fetcher, &options).await;
      client.complete(&task_key, id, result.map(|data| Arc::new(data) as Erased));
    });

    let entry = inner.entries.entry(key.clone()).or_insert_with(Entry::new);
    if entry.data.is_none() {
      entry.status = QueryStatus::Loading;
    }
    entry.in_flight = Some(InFlight {
      id,
      abort: handle.abort_handle(),
    });
    entry.version += 1;
    info!(%key, fetch = id, background = entry.data.is_some(), "fetch started");
  }

  fn complete(&self, key: &QueryKey, id: u64, result: Result<Erased, String>) {
    let mut inner = self.lock();
    let Some(entry) = inner.entries.get_mut(key) else {
      return;
    };
    if entry.in_flight.as_ref().map(|f| f.id) != Some(id) {
      debug!(%key, fetch = id, "discarding superseded result");
      return;
    }

    entry.in_flight = None;
    match result {
      Ok(data) => {
        entry.status = QueryStatus::Success;
        entry.data = Some(data);
        entry.error = None;
        entry.updated_at = Some(Instant::now());
        entry.updated_wall = Some(Local::now());
        entry.invalidated = false;
        info!(%key, fetch = id, "fetch succeeded");
      }
      Err(error) => {
        entry.status = QueryStatus::Error;
        entry.error = Some(error);
      }
    }
    entry.version += 1;
  }
}

impl std::fmt::Debug for QueryClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QueryClient")
      .field("entries", &self.len())
      .field("defaults", &self.defaults)
      .finish()
  }
}

/// Backoff before retry number `attempt` (0-based): 1s, 2s, 4s, ... capped.
pub fn retry_delay(attempt: u32, cap: Duration) -> Duration {
  let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
  Duration::from_secs(1).saturating_mul(factor).min(cap)
}

async fn run_with_retry<T>(
  key: &QueryKey,
  fetcher: &Fetcher<T>,
  options: &QueryOptions,
) -> Result<T, String> {
  let mut attempt = 0;
  loop {
    match fetcher().await {
      Ok(data) => return Ok(data),
      Err(error) if attempt < options.retry => {
        let delay = retry_delay(attempt, options.retry_delay_cap);
        warn!(%key, attempt, %error, ?delay, "fetch failed, retrying");
        tokio::time::sleep(delay).await;
        attempt += 1;
      }
      Err(error) => {
        warn!(%key, %error, "fetch failed");
        return Err(error);
      }
    }
  }
}
