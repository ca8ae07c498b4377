//! Conversions between domain types and the plain-text column values.
//!
//! Timestamps are RFC 3339 strings; ids are hyphenated lowercase UUIDs.

use chrono::{DateTime, Utc};
use missive_core::{SubmissionInput, sink::LogRecord};
use uuid::Uuid;

use crate::{Error, Result};

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

/// A `submissions` row exactly as read from SQLite.
pub struct RawSubmission {
  pub submission_id: String,
  pub recorded_at:   String,
  pub first_name:    String,
  pub last_name:     String,
  pub email:         String,
  pub subject:       String,
  pub message:       String,
}

impl RawSubmission {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      submission_id: row.get(0)?,
      recorded_at:   row.get(1)?,
      first_name:    row.get(2)?,
      last_name:     row.get(3)?,
      email:         row.get(4)?,
      subject:       row.get(5)?,
      message:       row.get(6)?,
    })
  }

  pub fn decode(self) -> Result<(Uuid, LogRecord)> {
    let id = decode_uuid(&self.submission_id)?;
    let record = LogRecord {
      recorded_at: decode_dt(&self.recorded_at)?,
      input:       SubmissionInput {
        first_name: self.first_name,
        last_name:  self.last_name,
        email:      self.email,
        subject:    self.subject,
        message:    self.message,
      },
    };
    Ok((id, record))
  }
}
