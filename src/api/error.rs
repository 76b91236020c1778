use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single remote fetch.
#[derive(Error, Debug)]
pub enum FetchError {
  /// The request never produced a response (DNS, connect, TLS, timeout, body read)
  #[error("request to {url} failed: {source}")]
  Network {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("request to {url} returned {status}")]
  Status { url: String, status: StatusCode },

  /// The server answered 2xx but the body was not the expected JSON shape
  #[error("malformed response from {url}: {source}")]
  Parse {
    url: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("invalid API url: {0}")]
  InvalidUrl(#[from] url::ParseError),

  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),
}

impl FetchError {
  /// Transport failures and non-2xx statuses both count as network errors.
  pub fn is_network(&self) -> bool {
    matches!(self, FetchError::Network { .. } | FetchError::Status { .. })
  }

  pub fn is_parse(&self) -> bool {
    matches!(self, FetchError::Parse { .. })
  }
}
