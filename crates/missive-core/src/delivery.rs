//! The `Delivery` trait: forwarding an accepted submission to its reader.
//!
//! Delivery runs after the submission has been logged. Unlike logging, a
//! delivery failure changes the outcome: the submitter is told to try again.

use std::future::Future;

use crate::input::SubmissionInput;

pub trait Delivery: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn deliver<'a>(
    &'a self,
    input: &'a SubmissionInput,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// A delivery that accepts every submission without sending anything.
///
/// Stands in where no outbound channel is configured; the log is then the
/// only record of the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Acknowledge;

impl Delivery for Acknowledge {
  type Error = std::convert::Infallible;

  async fn deliver(&self, _input: &SubmissionInput) -> Result<(), Self::Error> { Ok(()) }
}
