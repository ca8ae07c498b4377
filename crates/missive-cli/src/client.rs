//! The network side of a submission: one POST, one raw response.

use std::future::Future;

use anyhow::{Context, Result};
use missive_core::SubmissionInput;
use reqwest::{Client, header};
use thiserror::Error;

/// Status and body of a response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
  pub status: u16,
  pub body:   Vec<u8>,
}

impl RawResponse {
  pub fn is_success(&self) -> bool { (200..300).contains(&self.status) }
}

/// The request never produced a response.
#[derive(Debug, Error)]
pub enum TransportError {
  #[error("connection failed: {0}")]
  Connection(String),

  #[error(transparent)]
  Http(#[from] reqwest::Error),
}

/// Sends a submission to the intake endpoint.
///
/// Implementations do not enforce a deadline; the controller bounds every
/// call and drops the future when the bound is exceeded.
pub trait Transport: Send + Sync {
  fn send<'a>(
    &'a self,
    input: &'a SubmissionInput,
  ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send + 'a;
}

/// HTTP transport posting a form-encoded body.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpTransport {
  client:   Client,
  endpoint: String,
}

impl HttpTransport {
  pub fn new(endpoint: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("missive/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, endpoint: endpoint.into() })
  }
}

impl Transport for HttpTransport {
  async fn send(&self, input: &SubmissionInput) -> Result<RawResponse, TransportError> {
    let resp = self
      .client
      .post(&self.endpoint)
      .header(header::ACCEPT, "application/json")
      .form(&input.wire_pairs())
      .send()
      .await
      .map_err(|e| {
        if e.is_connect() {
          TransportError::Connection(e.to_string())
        } else {
          TransportError::Http(e)
        }
      })?;

    let status = resp.status().as_u16();
    let body = resp.bytes().await?.to_vec();
    Ok(RawResponse { status, body })
  }
}
