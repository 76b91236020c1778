use serde::{Deserialize, Serialize};

/// A post as returned by `GET /posts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
  pub user_id: u64,
  pub id: u64,
  pub title: String,
  pub body: String,
}

/// A user as returned by `GET /users/{id}`
///
/// The endpoint returns a much larger object (address, company, ...);
/// only the fields shown on screen are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  pub id: u64,
  pub name: String,
  pub email: String,
  pub phone: String,
}
