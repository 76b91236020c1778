//! Data-fetching hooks: each binds one fetcher to its query key and policy.

use crate::api::{ApiClient, Post, User};
use crate::query::{Query, QueryClient, QueryKey};
use std::time::Duration;

/// How long a fetched user stays fresh
pub const USER_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// The post list, refetched on every mount (stale immediately).
pub fn use_posts(client: &QueryClient, api: &ApiClient) -> Query<Vec<Post>> {
  let api = api.clone();
  let mut query = Query::new(client.clone(), QueryKey::Posts, move || {
    let api = api.clone();
    async move { api.fetch_posts().await.map_err(|e| e.to_string()) }
  });
  query.mount();
  query
}

/// A single user, served from cache for [`USER_STALE_TIME`] after each fetch.
pub fn use_user(client: &QueryClient, api: &ApiClient, user_id: u64) -> Query<User> {
  let api = api.clone();
  let mut query = Query::new(client.clone(), QueryKey::User(user_id), move || {
    let api = api.clone();
    async move { api.fetch_user(user_id).await.map_err(|e| e.to_string()) }
  })
  .with_stale_time(USER_STALE_TIME);
  query.mount();
  query
}
