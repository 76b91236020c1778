use crate::api::{ApiClient, FetchError};
use crate::config::Config;
use crate::query::QueryClient;
use crate::store::CounterStore;

/// Services injected into every view.
///
/// Clones share the same cache, counter and connection pool.
#[derive(Debug, Clone)]
pub struct Context {
  pub api: ApiClient,
  pub queries: QueryClient,
  pub counter: CounterStore,
}

impl Context {
  pub fn new(config: &Config) -> Result<Self, FetchError> {
    Ok(Self {
      api: ApiClient::new(&config.api)?,
      queries: QueryClient::with_defaults(config.query.options()),
      counter: CounterStore::new(),
    })
  }
}
