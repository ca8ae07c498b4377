//! HTTP server wiring for the missive contact-form endpoint.
//!
//! Combines the intake router from `missive-api` with a health check and
//! request tracing, and defines the server's configuration.

pub mod file_log;

pub use file_log::{FileLog, LogError};

use std::path::PathBuf;

use axum::{Router, routing::get};
use missive_api::{IntakeState, Latency, intake_router};
use missive_core::{delivery::Delivery, sink::SubmissionLog};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Where accepted submissions are recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LogTarget {
  /// Append formatted records to a text file.
  File { path: PathBuf },
  /// Insert rows into a SQLite database.
  Sqlite { path: PathBuf },
}

impl Default for LogTarget {
  fn default() -> Self { LogTarget::File { path: PathBuf::from("contact_log.txt") } }
}

/// Runtime server configuration, deserialised from `missive.toml` and
/// `MISSIVE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default)]
  pub log_target:     LogTarget,
  /// Lower bound of the simulated processing time.
  #[serde(default = "default_latency_min_ms")]
  pub latency_min_ms: u64,
  #[serde(default = "default_latency_max_ms")]
  pub latency_max_ms: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_latency_min_ms() -> u64 { 1000 }

fn default_latency_max_ms() -> u64 { 3000 }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:           default_host(),
      port:           default_port(),
      log_target:     LogTarget::default(),
      latency_min_ms: default_latency_min_ms(),
      latency_max_ms: default_latency_max_ms(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional file at `path` under `MISSIVE_*` environment
  /// variables. Nested keys use `__`, e.g. `MISSIVE_LOG_TARGET__KIND=sqlite`.
  pub fn load(path: impl Into<PathBuf>) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path.into()).required(false))
      .add_source(
        config::Environment::with_prefix("MISSIVE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn latency(&self) -> Latency {
    Latency::from_millis(self.latency_min_ms, self.latency_max_ms)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<L, D>(state: IntakeState<L, D>) -> Router
where
  L: SubmissionLog + 'static,
  D: Delivery + 'static,
{
  Router::new()
    .route("/healthz", get(healthz))
    .merge(intake_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use missive_core::{Reply, delivery::Acknowledge};
  use missive_store_sqlite::SqliteLog;
  use tower::ServiceExt as _;

  const SCENARIO_A: &str = "f_name=Ann&l_name=Lee&email=ann%40example.com\
    &subject=Hello+there&message=This+is+a+valid+message+body.";

  fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("missive-{}-{name}", uuid::Uuid::new_v4()))
  }

  async fn post(app: Router, body: &str) -> (StatusCode, Reply) {
    let req = Request::builder()
      .method("POST")
      .uri("/contact")
      .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
      .body(Body::from(body.to_string()))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, Reply::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn healthz_returns_ok() {
    let state = IntakeState::new(FileLog::new(temp_path("h.txt")), Acknowledge, Latency::none());
    let resp = router(state)
      .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn accepted_submission_lands_in_the_file() {
    let path = temp_path("contact_log.txt");
    let state = IntakeState::new(FileLog::new(&path), Acknowledge, Latency::none());
    let (status, reply) = post(router(state), SCENARIO_A).await;

    assert_eq!(status, StatusCode::OK);
    assert!(reply.success, "{reply:?}");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("New message from: Ann Lee (ann@example.com)"), "{text}");
    let _ = std::fs::remove_file(&path);
  }

  #[tokio::test]
  async fn unwritable_log_target_still_succeeds() {
    let path = temp_path("no-such-dir").join("contact_log.txt");
    let state = IntakeState::new(FileLog::new(&path), Acknowledge, Latency::none());
    let (status, reply) = post(router(state), SCENARIO_A).await;

    assert_eq!(status, StatusCode::OK);
    assert!(reply.success, "{reply:?}");
    assert!(reply.message.contains("Ann") && reply.message.contains("ann@example.com"));
    assert!(!path.exists());
  }

  #[tokio::test]
  async fn sqlite_target_records_submission() {
    let log = SqliteLog::open_in_memory().await.unwrap();
    let state = IntakeState::new(log.clone(), Acknowledge, Latency::none());
    let (_, reply) = post(router(state), SCENARIO_A).await;

    assert!(reply.success);
    let recent = log.recent(1).await.unwrap();
    assert_eq!(recent[0].1.input.email, "ann@example.com");
  }

  #[tokio::test]
  async fn simulated_latency_delays_the_reply() {
    let state = IntakeState::new(
      FileLog::new(temp_path("latency.txt")),
      Acknowledge,
      Latency::from_millis(50, 60),
    );
    let started = std::time::Instant::now();
    let (_, reply) = post(router(state), "f_name=").await;
    assert!(!reply.success);
    assert!(started.elapsed() >= std::time::Duration::from_millis(50));
  }

  #[test]
  fn config_defaults_apply_to_an_empty_file() {
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str("", config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg, ServerConfig::default());
    assert_eq!(cfg.latency(), Latency::from_millis(1000, 3000));
  }

  #[test]
  fn config_reads_sqlite_target() {
    let toml = r#"
      port = 9000
      latency_min_ms = 0
      latency_max_ms = 0

      [log_target]
      kind = "sqlite"
      path = "/var/lib/missive/log.db"
    "#;
    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.address(), "127.0.0.1:9000");
    assert_eq!(cfg.latency(), Latency::none());
    assert_eq!(
      cfg.log_target,
      LogTarget::Sqlite { path: PathBuf::from("/var/lib/missive/log.db") }
    );
  }
}
