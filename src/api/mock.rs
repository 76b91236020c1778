//! In-process HTTP server standing in for the remote API in tests.

use super::{ApiClient, Post, User};
use crate::config::ApiConfig;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub(crate) async fn serve(router: Router) -> String {
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
    .await
    .expect("bind mock server");
  let addr = listener.local_addr().expect("mock server address");
  tokio::spawn(async move {
    axum::serve(listener, router).await.expect("mock server");
  });
  format!("http://{}", addr)
}

pub(crate) fn client(base_url: &str) -> ApiClient {
  ApiClient::new(&ApiConfig {
    base_url: base_url.to_string(),
    ..ApiConfig::default()
  })
  .expect("mock api client")
}

pub(crate) fn post(id: u64) -> Post {
  Post {
    user_id: (id % 3) + 1,
    id,
    title: format!("post title {}", id),
    body: format!("body of post {}\nsecond line\nthird line\nfourth line", id),
  }
}

pub(crate) fn user(id: u64) -> User {
  User {
    id,
    name: format!("User {}", id),
    email: format!("user{}@example.com", id),
    phone: "555-0100".to_string(),
  }
}

/// `/posts` answering with `n` posts
pub(crate) fn posts_router(n: usize) -> Router {
  let posts: Vec<Post> = (1..=n as u64).map(post).collect();
  Router::new().route("/posts", get(move || async move { Json(posts) }))
}

/// `/posts` that waits `delay` before answering, counting requests in `hits`
pub(crate) fn slow_posts_router(n: usize, delay: Duration, hits: Arc<AtomicUsize>) -> Router {
  let posts: Vec<Post> = (1..=n as u64).map(post).collect();
  Router::new().route(
    "/posts",
    get(move || {
      let posts = posts.clone();
      let hits = hits.clone();
      async move {
        hits.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(delay).await;
        Json(posts)
      }
    }),
  )
}

/// `/posts` answering once with `n` posts, then failing with 500
pub(crate) fn flaky_posts_router(n: usize, hits: Arc<AtomicUsize>) -> Router {
  let posts: Vec<Post> = (1..=n as u64).map(post).collect();
  Router::new().route(
    "/posts",
    get(move || {
      let posts = posts.clone();
      let hits = hits.clone();
      async move {
        if hits.fetch_add(1, Ordering::SeqCst) == 0 {
          Ok(Json(posts))
        } else {
          Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
      }
    }),
  )
}

/// `/users/{id}` echoing the requested id, counting requests in `hits`
pub(crate) fn users_router(hits: Arc<AtomicUsize>) -> Router {
  Router::new().route(
    "/users/{id}",
    get(move |Path(id): Path<u64>| {
      let hits = hits.clone();
      async move {
        hits.fetch_add(1, Ordering::SeqCst);
        Json(user(id))
      }
    }),
  )
}

/// Every path answers with `status` and an empty body
pub(crate) fn status_router(status: StatusCode) -> Router {
  Router::new().fallback(move || async move { status })
}
