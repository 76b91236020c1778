use futures::FutureExt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use super::client::{Fetcher, QueryClient};
use super::key::QueryKey;
use super::state::{QueryOptions, QueryResult};

/// A view's handle on one cache entry.
///
/// Query<T> encapsulates:
/// - The fetching logic (via a closure)
/// - The key and options it reads the shared cache with
/// - Change detection for the event loop via `poll()`
///
/// Creating a query registers an observer on its key; dropping it
/// deregisters, which makes the entry eligible for garbage collection.
pub struct Query<T> {
  client: QueryClient,
  key: QueryKey,
  fetcher: Fetcher<T>,
  options: QueryOptions,
  seen_version: u64,
  _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Query<T> {
  /// Create a new query with the given fetcher function.
  ///
  /// The fetcher is a closure that returns a future. It is called each time
  /// the cache decides to fetch this key. Options start from the client's
  /// defaults.
  pub fn new<F, Fut>(client: QueryClient, key: QueryKey, fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    client.observe(&key);
    let options = client.default_options().clone();
    Self {
      client,
      key,
      fetcher: Arc::new(move || fetcher().boxed()),
      options,
      seen_version: 0,
      _marker: PhantomData,
    }
  }

  /// Set the stale time for this query.
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.options.stale_time = stale_time;
    self
  }

  pub fn key(&self) -> &QueryKey {
    &self.key
  }

  pub fn options(&self) -> &QueryOptions {
    &self.options
  }

  /// Fetch if the cached entry is missing or stale, otherwise serve it as is.
  ///
  /// Returns whether a fetch was started.
  pub fn mount(&mut self) -> bool {
    self.client.ensure(&self.key, &self.fetcher, &self.options)
  }

  /// Start fetching unless a fetch for this key is already in flight.
  pub fn fetch(&mut self) {
    self.client.fetch(&self.key, &self.fetcher, &self.options);
  }

  /// Force a new fetch, superseding any in flight. Cached data stays visible.
  pub fn refetch(&mut self) {
    self.client.refetch(&self.key, &self.fetcher, &self.options);
  }

  /// Check whether the entry changed since the last poll.
  ///
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let version = self.client.version(&self.key);
    let changed = version != self.seen_version;
    self.seen_version = version;
    changed
  }

  pub fn result(&self) -> QueryResult<T> {
    self.client.snapshot(&self.key)
  }

  pub fn data(&self) -> Option<Arc<T>> {
    self.result().data
  }

  /// First load in flight with nothing cached
  pub fn is_loading(&self) -> bool {
    self.result().is_loading()
  }

  pub fn is_success(&self) -> bool {
    self.result().is_success()
  }

  pub fn is_error(&self) -> bool {
    self.result().is_error()
  }

  /// Any fetch in flight, including background refetches
  pub fn is_fetching(&self) -> bool {
    self.result().is_fetching
  }

  pub fn error(&self) -> Option<String> {
    self.result().error
  }

  pub fn is_stale(&self) -> bool {
    self.client.is_stale(&self.key, self.options.stale_time)
  }
}

impl<T> Drop for Query<T> {
  fn drop(&mut self) {
    self.client.unobserve(&self.key);
  }
}

impl<T> std::fmt::Debug for Query<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("key", &self.key)
      .field("options", &self.options)
      .field("seen_version", &self.seen_version)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};

  async fn settle<T: Send + Sync + 'static>(query: &Query<T>) {
    for _ in 0..2000 {
      if !query.is_fetching() {
        return;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("query {} never settled", query.key());
  }

  fn counting_query(client: &QueryClient, key: QueryKey, calls: Arc<AtomicU32>) -> Query<u32> {
    Query::new(client.clone(), key, move || {
      let calls = calls.clone();
      async move { Ok::<_, String>(calls.fetch_add(1, Ordering::SeqCst) + 1) }
    })
  }

  #[tokio::test]
  async fn test_query_success() {
    let client = QueryClient::new();
    let mut query = Query::new(client, QueryKey::Posts, || async {
      Ok::<_, String>(vec![1, 2, 3])
    });

    assert!(query.result().is_idle());

    query.fetch();
    assert!(query.is_loading());

    settle(&query).await;
    assert!(query.poll());
    assert!(query.is_success());
    assert_eq!(query.data().as_deref(), Some(&vec![1, 2, 3]));
  }

  #[tokio::test]
  async fn test_query_error() {
    let client = QueryClient::new();
    let mut query: Query<i32> = Query::new(client, QueryKey::Posts, || async {
      Err("Something went wrong".to_string())
    });

    query.fetch();
    settle(&query).await;

    assert!(query.is_error());
    assert_eq!(query.error().as_deref(), Some("Something went wrong"));
  }

  #[tokio::test]
  async fn test_poll_reports_changes_once() {
    let client = QueryClient::new();
    let mut query = counting_query(&client, QueryKey::Posts, Arc::default());

    assert!(!query.poll());
    query.mount();
    settle(&query).await;

    assert!(query.poll());
    assert!(!query.poll());
  }

  #[tokio::test]
  async fn test_observers_share_one_entry() {
    let client = QueryClient::new();
    let calls = Arc::new(AtomicU32::new(0));
    let week = Duration::from_secs(7 * 24 * 3600);

    let mut first = counting_query(&client, QueryKey::User(7), calls.clone()).with_stale_time(week);
    assert!(first.mount());
    settle(&first).await;

    let mut second =
      counting_query(&client, QueryKey::User(7), calls.clone()).with_stale_time(week);
    assert!(!second.mount());
    assert_eq!(second.data().as_deref(), Some(&1));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_zero_stale_time_refetches_on_mount() {
    let client = QueryClient::new();
    let calls = Arc::new(AtomicU32::new(0));

    let mut first = counting_query(&client, QueryKey::Posts, calls.clone());
    first.mount();
    settle(&first).await;
    assert!(first.is_stale());

    let mut second = counting_query(&client, QueryKey::Posts, calls.clone());
    assert!(second.mount());
    // Cached value is served while revalidating
    assert_eq!(second.data().as_deref(), Some(&1));
    assert!(second.is_fetching());
    settle(&second).await;
    assert_eq!(second.data().as_deref(), Some(&2));
  }

  #[tokio::test(start_paused = true)]
  async fn test_drop_releases_entry_for_gc() {
    let client = QueryClient::new();
    let mut query = counting_query(&client, QueryKey::Posts, Arc::default());
    query.mount();
    settle(&query).await;

    let gc_time = Duration::from_secs(300);
    tokio::time::advance(Duration::from_secs(600)).await;
    assert_eq!(client.collect_garbage(gc_time), 0);

    drop(query);
    tokio::time::advance(Duration::from_secs(301)).await;
    assert_eq!(client.collect_garbage(gc_time), 1);
    assert!(client.is_empty());
  }

  #[test]
  fn test_defaults_come_from_client() {
    let client = QueryClient::with_defaults(QueryOptions::default().with_retry(3));
    let query = counting_query(&client, QueryKey::Posts, Arc::default());
    assert_eq!(query.options().retry, 3);
  }
}
