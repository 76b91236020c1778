//! File logging. The terminal belongs to the TUI, so nothing is written to stdout.

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Install a global subscriber writing to `path`.
///
/// `RUST_LOG` overrides the default `info` filter. Keep the returned guard
/// alive for the life of the program; dropping it flushes pending lines.
pub fn init(path: &Path) -> Result<WorkerGuard> {
  let dir = path
    .parent()
    .ok_or_else(|| eyre!("Log path has no parent directory: {}", path.display()))?;
  let file_name = path
    .file_name()
    .ok_or_else(|| eyre!("Log path has no file name: {}", path.display()))?;

  std::fs::create_dir_all(dir)
    .wrap_err_with(|| format!("Failed to create log directory {}", dir.display()))?;

  let appender = tracing_appender::rolling::never(dir, file_name);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_ansi(false)
    .with_writer(writer)
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  Ok(guard)
}
