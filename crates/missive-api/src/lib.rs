//! The contact-form intake endpoint.
//!
//! Exposes an axum [`Router`] backed by any [`SubmissionLog`] and
//! [`Delivery`]. TLS, tracing middleware and listener setup are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(missive_api::intake_router(state))
//! ```

pub mod error;
pub mod form;
pub mod intake;
pub mod latency;

use std::sync::Arc;

use axum::{Router, routing::post};
use missive_core::{delivery::Delivery, sink::SubmissionLog};

pub use error::ApiError;
pub use latency::Latency;

/// Shared state for the intake handlers.
pub struct IntakeState<L, D> {
  pub log:      Arc<L>,
  pub delivery: Arc<D>,
  pub latency:  Latency,
}

impl<L, D> IntakeState<L, D> {
  pub fn new(log: L, delivery: D, latency: Latency) -> Self {
    Self { log: Arc::new(log), delivery: Arc::new(delivery), latency }
  }
}

impl<L, D> Clone for IntakeState<L, D> {
  fn clone(&self) -> Self {
    Self {
      log:      Arc::clone(&self.log),
      delivery: Arc::clone(&self.delivery),
      latency:  self.latency,
    }
  }
}

/// Build the intake router: `POST /contact`, with every other method on the
/// same path answered by [`intake::wrong_method`].
pub fn intake_router<L, D>(state: IntakeState<L, D>) -> Router<()>
where
  L: SubmissionLog + 'static,
  D: Delivery + 'static,
{
  Router::new()
    .route(
      "/contact",
      post(intake::submit::<L, D>).fallback(intake::wrong_method),
    )
    .with_state(state)
}
