use crate::query::QueryOptions;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  pub query: QueryConfig,
  pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Root of the JSON API; `posts` and `users/{id}` are resolved beneath it
  pub base_url: String,
  /// Value sent as `_limit` when listing posts
  pub posts_limit: usize,
  /// Per-request timeout
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
      posts_limit: 5,
      timeout_secs: 10,
    }
  }
}

/// Defaults applied to every query unless a hook overrides them
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
  /// Seconds before fetched data counts as stale (0 = immediately)
  pub stale_secs: u64,
  /// Seconds an unobserved cache entry is kept before eviction
  pub gc_secs: u64,
  /// Extra attempts after a failed fetch
  pub retry: u32,
}

impl Default for QueryConfig {
  fn default() -> Self {
    Self {
      stale_secs: 0,
      gc_secs: 5 * 60,
      retry: 0,
    }
  }
}

impl QueryConfig {
  pub fn options(&self) -> QueryOptions {
    QueryOptions::default()
      .with_stale_time(Duration::from_secs(self.stale_secs))
      .with_retry(self.retry)
  }

  pub fn gc_time(&self) -> Duration {
    Duration::from_secs(self.gc_secs)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
  pub tick_rate_ms: u64,
  /// Custom title for the header bar
  pub title: Option<String>,
}

impl Default for UiConfig {
  fn default() -> Self {
    Self {
      tick_rate_ms: 250,
      title: None,
    }
  }
}

impl UiConfig {
  pub fn tick_rate(&self) -> Duration {
    Duration::from_millis(self.tick_rate_ms.max(10))
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./tstack.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/tstack/config.yaml
  ///
  /// Without any file the built-in defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("tstack.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("tstack").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  pub fn from_yaml(contents: &str) -> Result<Self> {
    // An empty file deserializes to unit, not to an empty mapping
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  /// Default location of the log file: $XDG_DATA_HOME/tstack/tstack.log
  pub fn default_log_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("tstack").join("tstack.log"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.api.posts_limit, 5);
    assert_eq!(config.query.options().stale_time, Duration::ZERO);
    assert_eq!(config.query.gc_time(), Duration::from_secs(300));
    assert_eq!(config.ui.tick_rate(), Duration::from_millis(250));
  }

  #[test]
  fn test_empty_file_uses_defaults() {
    let config = Config::from_yaml("\n").unwrap();
    assert_eq!(config.api.timeout_secs, 10);
  }

  #[test]
  fn test_partial_sections() {
    let config = Config::from_yaml(
      r#"
api:
  base_url: http://localhost:3000
query:
  stale_secs: 30
  retry: 2
ui:
  title: Demo
"#,
    )
    .unwrap();

    assert_eq!(config.api.base_url, "http://localhost:3000");
    assert_eq!(config.api.posts_limit, 5);
    assert_eq!(config.query.options().stale_time, Duration::from_secs(30));
    assert_eq!(config.query.options().retry, 2);
    assert_eq!(config.query.gc_secs, 300);
    assert_eq!(config.ui.title.as_deref(), Some("Demo"));
    assert_eq!(config.ui.tick_rate_ms, 250);
  }

  #[test]
  fn test_invalid_yaml_is_error() {
    assert!(Config::from_yaml("api: [1, 2").is_err());
  }

  #[test]
  fn test_missing_explicit_path_is_error() {
    let result = Config::load(Some(Path::new("/definitely/not/here/tstack.yaml")));
    assert!(result.is_err());
  }
}
