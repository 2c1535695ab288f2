//! crew-server binary.
//!
//! Reads `crew.toml` (or the path specified with `--config`) plus `CREW_*`
//! environment overrides, opens the SQLite store, and serves the directory
//! API over HTTP.
//!
//! # Seeding
//!
//! To replace the directory's contents with the entries of a JSON array:
//!
//! ```
//! cargo run -p crew-server -- seed crates/crew-server/seed.json
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use crew_core::person::NewPerson;
use crew_server::{ServerConfig, seed};
use crew_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "crew team directory server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "crew.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Replace every stored person with the entries of a JSON file and exit.
  Seed {
    /// JSON array of people, same shape as `POST /api/people` bodies.
    file: PathBuf,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent)
      .await
      .with_context(|| format!("failed to create {parent:?}"))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(store, &server_cfg).await,
    Command::Seed { file } => run_seed(&store, &file).await,
  }
}

async fn serve(store: SqliteStore, server_cfg: &ServerConfig) -> anyhow::Result<()> {
  let app = crew_server::router(Arc::new(store), server_cfg);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn run_seed(store: &SqliteStore, file: &Path) -> anyhow::Result<()> {
  let raw = tokio::fs::read_to_string(file)
    .await
    .with_context(|| format!("reading seed file {}", file.display()))?;
  let drafts: Vec<NewPerson> =
    serde_json::from_str(&raw).context("parsing seed file")?;

  let report = seed::seed(store, drafts).await.context("seeding store")?;
  tracing::info!(
    removed = report.removed,
    inserted = report.inserted,
    "store seeded"
  );
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
