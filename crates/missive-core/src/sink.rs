//! The `SubmissionLog` trait: where accepted submissions are recorded.
//!
//! Recording is best-effort. The intake endpoint inspects the returned
//! `Result`, reports a failure on its operational channel, and carries on;
//! an implementation's error never reaches the submitter.

use std::future::Future;

use chrono::{DateTime, Utc};

use crate::input::SubmissionInput;

/// One accepted submission, stamped with the time it was recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
  pub recorded_at: DateTime<Utc>,
  pub input:       SubmissionInput,
}

impl LogRecord {
  pub fn now(input: SubmissionInput) -> Self {
    Self { recorded_at: Utc::now(), input }
  }

  /// The pre-formatted, newline-terminated text of this record.
  pub fn line(&self) -> String {
    let i = &self.input;
    format!(
      "{} - New message from: {} {} ({})\nSubject: {}\nMessage: {}\n\n",
      self.recorded_at.format("%Y-%m-%d %H:%M:%S"),
      i.first_name,
      i.last_name,
      i.email,
      i.subject,
      i.message,
    )
  }
}

/// An append-only target for accepted submissions.
///
/// Implementations must tolerate concurrent appends from independent
/// requests; no read-modify-write is ever needed.
pub trait SubmissionLog: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Append `record` to the log.
  fn append<'a>(
    &'a self,
    record: &'a LogRecord,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Identifies the append target in operational logs (a path, a DSN, ...).
  fn target(&self) -> String;
}
