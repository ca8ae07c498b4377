//! [`SqliteLog`]: the SQLite implementation of [`SubmissionLog`].

use std::path::Path;

use missive_core::sink::{LogRecord, SubmissionLog};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawSubmission, encode_dt, encode_uuid},
  schema::SCHEMA,
};

/// An append-only submission log backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Concurrent
/// appends are serialised on the connection's thread.
#[derive(Clone)]
pub struct SqliteLog {
  conn:   tokio_rusqlite::Connection,
  target: String,
}

impl SqliteLog {
  /// Open (or create) a log at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let target = path.as_ref().display().to_string();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let log = Self { conn, target };
    log.init_schema().await?;
    Ok(log)
  }

  /// Open an in-memory log, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let log = Self { conn, target: ":memory:".to_string() };
    log.init_schema().await?;
    Ok(log)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert `record` and return the id assigned to it.
  pub async fn insert(&self, record: &LogRecord) -> Result<Uuid> {
    let id = Uuid::new_v4();

    let id_str      = encode_uuid(id);
    let at_str      = encode_dt(record.recorded_at);
    let input       = record.input.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO submissions \
             (submission_id, recorded_at, first_name, last_name, email, subject, message) \
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            at_str,
            input.first_name,
            input.last_name,
            input.email,
            input.subject,
            input.message,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(id)
  }

  /// The most recent `limit` records, newest first.
  pub async fn recent(&self, limit: usize) -> Result<Vec<(Uuid, LogRecord)>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawSubmission> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT submission_id, recorded_at, first_name, last_name, email, subject, message \
           FROM submissions \
           ORDER BY recorded_at DESC, rowid DESC \
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawSubmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubmission::decode).collect()
  }

  /// Total number of recorded submissions.
  pub async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM submissions", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }
}

impl SubmissionLog for SqliteLog {
  type Error = crate::Error;

  async fn append(&self, record: &LogRecord) -> Result<()> {
    self.insert(record).await.map(|_| ())
  }

  fn target(&self) -> String { format!("sqlite:{}", self.target) }
}
