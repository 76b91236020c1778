mod api;
mod app;
mod commands;
mod config;
mod context;
mod event;
mod hooks;
mod logging;
mod query;
mod store;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tstack")]
#[command(about = "A terminal starter app: navigation, cached data fetching and a shared counter")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./tstack.yaml or $XDG_CONFIG_HOME/tstack/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Root URL of the JSON API
  #[arg(short, long)]
  base_url: Option<String>,

  /// Where to write logs (default: $XDG_DATA_HOME/tstack/tstack.log)
  #[arg(long)]
  log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override base URL if specified on command line
  if let Some(base_url) = args.base_url {
    config.api.base_url = base_url;
  }

  let log_path = match args.log_file {
    Some(path) => path,
    None => config::Config::default_log_path()?,
  };
  let _log_guard = logging::init(&log_path)?;

  // Initialize and run the app
  let mut app = app::App::new(config)?;
  app.run().await?;

  Ok(())
}
