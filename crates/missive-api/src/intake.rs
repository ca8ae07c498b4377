//! Handlers for the `/contact` intake endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/contact` | Form-encoded or multipart body; always `200` with a [`Reply`] |
//! | other  | `/contact` | `405` with a [`Reply`]; the body is never read |

use axum::{Json, extract::State};
use missive_core::{
  Reply, Rejection, SubmissionInput, SubmissionResult,
  delivery::Delivery,
  outcome::DELIVERY_FAILED_MESSAGE,
  sink::{LogRecord, SubmissionLog},
  validate,
};

use crate::{IntakeState, error::ApiError, form::IntakeForm};

/// `POST /contact`
///
/// Business rejections are still `200`: the `success` flag in the body is
/// the signal clients read.
pub async fn submit<L, D>(
  State(state): State<IntakeState<L, D>>,
  IntakeForm(raw): IntakeForm,
) -> Json<Reply>
where
  L: SubmissionLog + 'static,
  D: Delivery + 'static,
{
  state.latency.wait().await;
  Json(process(&state, &raw).await.into())
}

/// Any method other than `POST` on `/contact`.
pub async fn wrong_method() -> ApiError { ApiError::WrongMethod }

/// Validate, record and deliver one submission.
///
/// The client is never trusted: the same rules it ran are run again here.
/// A logging failure is reported and swallowed; a delivery failure turns
/// into a rejection.
pub async fn process<L, D>(
  state: &IntakeState<L, D>,
  raw: &SubmissionInput,
) -> SubmissionResult
where
  L: SubmissionLog,
  D: Delivery,
{
  let input = raw.trimmed();

  let violations = validate(&input);
  if !violations.is_empty() {
    tracing::info!(
      fields = ?violations.iter().map(|v| v.field).collect::<Vec<_>>(),
      "submission rejected"
    );
    return SubmissionResult::Rejected(Rejection::Violations(violations));
  }

  let record = LogRecord::now(input.clone());
  if let Err(error) = state.log.append(&record).await {
    tracing::error!(
      log_target = %state.log.target(),
      %error,
      "failed to record contact submission"
    );
  }

  if let Err(error) = state.delivery.deliver(&input).await {
    tracing::error!(%error, "failed to deliver contact submission");
    return SubmissionResult::Rejected(Rejection::General(
      DELIVERY_FAILED_MESSAGE.to_string(),
    ));
  }

  tracing::info!(email = %input.email, "submission accepted");
  SubmissionResult::accepted_for(&input)
}
