//! `missive`: terminal contact form for a missive intake endpoint.
//!
//! # Usage
//!
//! ```
//! missive --url http://localhost:8080/contact
//! missive --config ~/.config/missive/client.toml --log-file /tmp/missive.log
//! missive send --first-name Ann --last-name Lee --email ann@example.com \
//!   --subject "Hello there" --message "This is a valid message body."
//! ```

mod app;
mod client;
mod console;
mod controller;
mod ui;

#[cfg(test)]
mod test_support;

use std::{
  fs::OpenOptions,
  io,
  path::{Path, PathBuf},
  process::ExitCode,
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use client::{HttpTransport, Transport};
use console::ConsoleRenderer;
use controller::{DEFAULT_TIMEOUT, LifecycleState, SubmissionController, SubmitOutcome};
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use missive_core::SubmissionInput;
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:8080/contact";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "missive", version, about = "Terminal contact form")]
struct Args {
  /// Path to a TOML config file (url, timeout_secs).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Intake endpoint (default: http://localhost:8080/contact).
  #[arg(long, env = "MISSIVE_URL")]
  url: Option<String>,

  /// Seconds to wait for a reply before giving up (default: 10).
  #[arg(long, env = "MISSIVE_TIMEOUT_SECS", value_name = "SECS")]
  timeout: Option<u64>,

  /// Write diagnostics to this file. Nothing is logged without it.
  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Submit one message without opening the form.
  Send {
    #[arg(long, default_value = "")]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name:  String,
    #[arg(long, default_value = "")]
    email:      String,
    #[arg(long, default_value = "")]
    subject:    String,
    #[arg(long, default_value = "")]
    message:    String,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug, PartialEq, Eq)]
struct ConfigFile {
  #[serde(default)]
  url:          Option<String>,
  #[serde(default)]
  timeout_secs: Option<u64>,
}

/// Effective client settings.
#[derive(Debug, PartialEq, Eq)]
struct ClientConfig {
  url:     String,
  timeout: Duration,
}

impl ClientConfig {
  /// CLI flags (and their env fallbacks) override the file, which overrides
  /// defaults.
  fn resolve(url: Option<String>, timeout_secs: Option<u64>, file: ConfigFile) -> Self {
    Self {
      url:     url.or(file.url).unwrap_or_else(|| DEFAULT_URL.to_string()),
      timeout: timeout_secs
        .or(file.timeout_secs)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TIMEOUT),
    }
  }
}

fn read_config_file(path: Option<&Path>) -> Result<ConfigFile> {
  let Some(path) = path else {
    return Ok(ConfigFile::default());
  };
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading config file {}", path.display()))?;
  toml::from_str(&raw).context("parsing config file")
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
  let Some(path) = log_file else {
    return Ok(());
  };
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let args = Args::parse();
  init_tracing(args.log_file.as_deref())?;

  let file_cfg = read_config_file(args.config.as_deref())?;
  let cfg = ClientConfig::resolve(args.url, args.timeout, file_cfg);
  tracing::info!(url = %cfg.url, timeout_secs = cfg.timeout.as_secs(), "client configured");

  let transport = HttpTransport::new(&cfg.url)?;

  match args.command {
    Some(Command::Send { first_name, last_name, email, subject, message }) => {
      let input = SubmissionInput { first_name, last_name, email, subject, message };
      send_once(transport, cfg.timeout, &input).await
    }
    None => run_tui(transport, cfg).await.map(|()| ExitCode::SUCCESS),
  }
}

async fn send_once<T: Transport>(
  transport: T,
  timeout: Duration,
  input: &SubmissionInput,
) -> Result<ExitCode> {
  let controller = SubmissionController::new(transport, ConsoleRenderer, timeout);
  let code = match controller.on_submit(input).await {
    SubmitOutcome::Finished(LifecycleState::Succeeded) => ExitCode::SUCCESS,
    _ => ExitCode::FAILURE,
  };
  Ok(code)
}

async fn run_tui(transport: HttpTransport, cfg: ClientConfig) -> Result<()> {
  let mut app = App::new(transport, cfg.timeout, cfg.url);

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<HttpTransport>,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting. The short
    // poll also repaints whatever a background submission changed.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key)
    {
      break;
    }
  }

  Ok(())
}
