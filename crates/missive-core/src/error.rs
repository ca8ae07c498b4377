//! Error types for `missive-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed reply: {0}")]
  MalformedReply(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
