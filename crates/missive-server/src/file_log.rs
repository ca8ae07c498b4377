//! [`FileLog`]: appends each accepted submission to a plain-text file.

use std::{io, path::PathBuf};

use missive_core::sink::{LogRecord, SubmissionLog};
use thiserror::Error;
use tokio::{fs::OpenOptions, io::AsyncWriteExt as _};

#[derive(Debug, Error)]
pub enum LogError {
  #[error("cannot open {}: {source}", path.display())]
  Open {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("cannot write {}: {source}", path.display())]
  Write {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },
}

/// A submission log kept in a text file.
///
/// The file is opened in append mode for every record and each record is a
/// single write, so concurrent requests interleave whole records and never
/// read back what is already there.
#[derive(Debug, Clone)]
pub struct FileLog {
  path: PathBuf,
}

impl FileLog {
  pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }
}

impl SubmissionLog for FileLog {
  type Error = LogError;

  async fn append(&self, record: &LogRecord) -> Result<(), LogError> {
    let mut file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&self.path)
      .await
      .map_err(|source| LogError::Open { path: self.path.clone(), source })?;

    let write = async {
      file.write_all(record.line().as_bytes()).await?;
      file.flush().await
    };
    write
      .await
      .map_err(|source| LogError::Write { path: self.path.clone(), source })
  }

  fn target(&self) -> String { self.path.display().to_string() }
}
