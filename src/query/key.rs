use std::fmt;

/// Identifies one independently cached fetch result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
  /// The post list shown on the about screen
  Posts,
  /// A single user by id
  User(u64),
}

impl fmt::Display for QueryKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      QueryKey::Posts => write!(f, "posts"),
      QueryKey::User(id) => write!(f, "user/{}", id),
    }
  }
}
