//! missive-server binary.
//!
//! Reads `missive.toml` (or the path given with `--config`) layered under
//! `MISSIVE_*` environment variables, opens the configured submission log,
//! and serves the contact endpoint over HTTP.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use missive_api::IntakeState;
use missive_core::{delivery::Acknowledge, sink::SubmissionLog};
use missive_server::{FileLog, LogTarget, ServerConfig};
use missive_store_sqlite::SqliteLog;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Contact-form intake server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "missive.toml")]
  config: PathBuf,

  /// Print the effective configuration as JSON and exit.
  #[arg(long)]
  check_config: bool,

  /// Print the N most recent submissions from a SQLite log and exit.
  #[arg(long, value_name = "N")]
  recent: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;
  cfg.log_target = match cfg.log_target {
    LogTarget::File { path } => LogTarget::File { path: expand_tilde(&path) },
    LogTarget::Sqlite { path } => LogTarget::Sqlite { path: expand_tilde(&path) },
  };

  if cli.check_config {
    println!("{}", serde_json::to_string_pretty(&cfg)?);
    return Ok(());
  }

  if let Some(n) = cli.recent {
    let LogTarget::Sqlite { path } = &cfg.log_target else {
      anyhow::bail!("--recent needs a sqlite log_target");
    };
    let log = SqliteLog::open(path)
      .await
      .with_context(|| format!("failed to open log at {path:?}"))?;
    for (_, record) in log.recent(n).await? {
      print!("{}", record.line());
    }
    return Ok(());
  }

  match cfg.log_target.clone() {
    LogTarget::File { path } => serve(&cfg, FileLog::new(path)).await,
    LogTarget::Sqlite { path } => {
      let log = SqliteLog::open(&path)
        .await
        .with_context(|| format!("failed to open log at {path:?}"))?;
      serve(&cfg, log).await
    }
  }
}

async fn serve<L>(cfg: &ServerConfig, log: L) -> anyhow::Result<()>
where
  L: SubmissionLog + 'static,
{
  tracing::info!(
    log_target = %log.target(),
    latency_min_ms = cfg.latency_min_ms,
    latency_max_ms = cfg.latency_max_ms,
    "submission log ready"
  );

  let state = IntakeState::new(log, Acknowledge, cfg.latency());
  let app = missive_server::router(state);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

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
