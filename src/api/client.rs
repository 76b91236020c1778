use crate::config::ApiConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use super::error::FetchError;
use super::types::{Post, User};

/// Client for the posts/users JSON API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
  http: Client,
  base_url: Url,
  posts_limit: usize,
}

impl ApiClient {
  pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
    let http = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .user_agent(concat!("tstack/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(FetchError::Client)?;

    Ok(Self {
      http,
      base_url: normalize_base_url(&config.base_url)?,
      posts_limit: config.posts_limit,
    })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Fetch the first `posts_limit` posts, in server order.
  pub async fn fetch_posts(&self) -> Result<Vec<Post>, FetchError> {
    let mut url = self.endpoint("posts")?;
    url
      .query_pairs_mut()
      .append_pair("_limit", &self.posts_limit.to_string());

    let posts: Vec<Post> = self.get_json(url).await?;
    Ok(dedup_posts(posts))
  }

  /// Fetch a single user by id
  pub async fn fetch_user(&self, user_id: u64) -> Result<User, FetchError> {
    let url = self.endpoint(&format!("users/{}", user_id))?;
    self.get_json(url).await
  }

  fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
    Ok(self.base_url.join(path)?)
  }

  async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
    info!(%url, "GET");

    let response = self
      .http
      .get(url.clone())
      .send()
      .await
      .map_err(|source| FetchError::Network {
        url: url.to_string(),
        source,
      })?;

    let status = response.status();
    if !status.is_success() {
      warn!(%url, %status, "request failed");
      return Err(FetchError::Status {
        url: url.to_string(),
        status,
      });
    }

    let body = response.text().await.map_err(|source| FetchError::Network {
      url: url.to_string(),
      source,
    })?;
    debug!(%url, bytes = body.len(), "response received");

    serde_json::from_str(&body).map_err(|source| {
      warn!(%url, error = %source, "response did not match expected shape");
      FetchError::Parse {
        url: url.to_string(),
        source,
      }
    })
  }
}

/// Parse a base URL so that relative endpoint paths join beneath it.
///
/// `Url::join` replaces the last path segment unless the path ends in `/`,
/// so `http://host/api` becomes `http://host/api/`.
fn normalize_base_url(raw: &str) -> Result<Url, FetchError> {
  let mut url = Url::parse(raw.trim())?;
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url)
}

/// Drop posts whose id already appeared earlier in the batch.
fn dedup_posts(posts: Vec<Post>) -> Vec<Post> {
  let mut seen = HashSet::new();
  posts
    .into_iter()
    .filter(|post| {
      let fresh = seen.insert(post.id);
      if !fresh {
        warn!(id = post.id, "dropping duplicate post");
      }
      fresh
    })
    .collect()
}
