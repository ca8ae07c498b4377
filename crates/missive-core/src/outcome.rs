//! Outcomes of a submission and their wire representation.

use serde::{Deserialize, Serialize};

use crate::{
  Result,
  input::SubmissionInput,
  validate::{FieldViolation, general_message},
};

/// Shown when delivery of an otherwise valid submission fails.
pub const DELIVERY_FAILED_MESSAGE: &str =
  "An error occurred while sending your message. Please try again later.";

/// Returned when the request body cannot be read as a form at all.
pub const UNREADABLE_FORM_MESSAGE: &str =
  "Your message could not be read. Please try again.";

/// Returned for any request that is not a form POST.
pub const WRONG_METHOD_MESSAGE: &str = "Invalid request method. Use POST.";

// ─── SubmissionResult ────────────────────────────────────────────────────────

/// The result of handling one submission. Created per request, consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
  Accepted { confirmation: String },
  Rejected(Rejection),
}

/// Why a submission was turned away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
  Violations(Vec<FieldViolation>),
  General(String),
}

impl Rejection {
  /// The single user-facing message for this rejection.
  pub fn message(&self) -> String {
    match self {
      Rejection::Violations(v) => general_message(v).unwrap_or_default().to_string(),
      Rejection::General(m) => m.clone(),
    }
  }
}

impl SubmissionResult {
  /// Acceptance whose confirmation names the submitter and their address.
  pub fn accepted_for(input: &SubmissionInput) -> Self {
    SubmissionResult::Accepted {
      confirmation: format!(
        "Thank you for your message, {}! We will contact you shortly at {}.",
        input.first_name, input.email
      ),
    }
  }
}

// ─── Reply ───────────────────────────────────────────────────────────────────

/// The JSON body exchanged over the wire: `{"success": bool, "message": str}`.
///
/// Consumers check `success` first. A missing `success` reads as `false`, and
/// a missing `message` as empty, matching how lenient browser clients treat
/// the same body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
  #[serde(default)]
  pub success: bool,
  #[serde(default)]
  pub message: String,
}

impl Reply {
  pub fn accepted(message: impl Into<String>) -> Self {
    Self { success: true, message: message.into() }
  }

  pub fn rejected(message: impl Into<String>) -> Self {
    Self { success: false, message: message.into() }
  }

  /// Parse a response body.
  pub fn from_slice(body: &[u8]) -> Result<Self> { Ok(serde_json::from_slice(body)?) }
}

impl From<SubmissionResult> for Reply {
  fn from(result: SubmissionResult) -> Self {
    match result {
      SubmissionResult::Accepted { confirmation } => Reply::accepted(confirmation),
      SubmissionResult::Rejected(rejection) => Reply::rejected(rejection.message()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Error, validate::{EMAIL_MESSAGE, validate}};

  #[test]
  fn accepted_reply_names_submitter_and_address() {
    let input = SubmissionInput::new(
      "Ann",
      "Lee",
      "ann@example.com",
      "Hello there",
      "This is a valid message body.",
    );
    let reply = Reply::from(SubmissionResult::accepted_for(&input));
    assert!(reply.success);
    assert!(reply.message.contains("Ann"));
    assert!(reply.message.contains("ann@example.com"));
  }

  #[test]
  fn violations_collapse_to_one_message() {
    let input = SubmissionInput::new("Ann", "Lee", "not-an-email", "Hello", "Long enough body");
    let result = SubmissionResult::Rejected(Rejection::Violations(validate(&input)));
    assert_eq!(Reply::from(result), Reply::rejected(EMAIL_MESSAGE));
  }

  #[test]
  fn reply_serialises_to_wire_shape() {
    let json = serde_json::to_value(Reply::accepted("ok")).unwrap();
    assert_eq!(json, serde_json::json!({ "success": true, "message": "ok" }));
  }

  #[test]
  fn reply_parsing_is_lenient_about_missing_keys() {
    let reply = Reply::from_slice(br#"{"message":"nope"}"#).unwrap();
    assert!(!reply.success);
    let reply = Reply::from_slice(br#"{"success":true}"#).unwrap();
    assert_eq!(reply, Reply::accepted(""));
  }

  #[test]
  fn reply_parsing_rejects_non_json() {
    let err = Reply::from_slice(b"<html>502 Bad Gateway</html>").unwrap_err();
    assert!(matches!(err, Error::MalformedReply(_)));
  }
}
