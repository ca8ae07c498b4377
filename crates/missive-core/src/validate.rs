//! The validation rules shared by the client and the intake endpoint.
//!
//! Every rule runs on every call; a submission with several bad fields gets a
//! violation for each of them. At most one violation is produced per field.
//! Lengths are counted in `char`s so Cyrillic names measure the same as Latin
//! ones.

use std::sync::LazyLock;

use regex::Regex;
use strum::IntoEnumIterator as _;

use crate::input::{Field, SubmissionInput};

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-zА-Яа-яЁё\s]+$").expect("name pattern compiles")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_SUBJECT_CHARS: usize = 3;
pub const MIN_MESSAGE_CHARS: usize = 10;

pub const REQUIRED_MESSAGE: &str = "Please fill in all required fields.";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const NAME_MESSAGE: &str =
  "First and last name must contain at least 2 letters and no digits or symbols.";
pub const SUBJECT_MESSAGE: &str = "Subject must contain at least 3 characters.";
pub const MESSAGE_MESSAGE: &str = "Message must contain at least 10 characters.";

// ─── Violations ──────────────────────────────────────────────────────────────

/// Which rule a field broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
  /// Empty after trimming.
  Required,
  TooShort,
  /// A name containing something other than letters and whitespace.
  InvalidCharacters,
  InvalidEmail,
}

/// A single rule failure tied to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
  pub field:   Field,
  pub kind:    ViolationKind,
  /// Inline guidance shown next to the field.
  pub message: &'static str,
}

impl FieldViolation {
  fn new(field: Field, kind: ViolationKind) -> Self {
    Self { field, kind, message: inline_message(field) }
  }
}

fn inline_message(field: Field) -> &'static str {
  match field {
    Field::FirstName => "Please enter a valid first name (at least 2 letters).",
    Field::LastName => "Please enter a valid last name (at least 2 letters).",
    Field::Email => "Please enter a valid email address.",
    Field::Subject => "Please enter a subject (at least 3 characters).",
    Field::Message => "Please enter a message (at least 10 characters).",
  }
}

// ─── Rules ───────────────────────────────────────────────────────────────────

/// Check every field of `input` and return all violations, in field order.
///
/// Values are trimmed before any rule looks at them, so callers may pass raw
/// input straight from a form.
pub fn validate(input: &SubmissionInput) -> Vec<FieldViolation> {
  Field::iter()
    .filter_map(|field| {
      check_field(field, input.get(field).trim())
        .map(|kind| FieldViolation::new(field, kind))
    })
    .collect()
}

fn check_field(field: Field, value: &str) -> Option<ViolationKind> {
  if value.is_empty() {
    return Some(ViolationKind::Required);
  }
  let chars = value.chars().count();
  match field {
    Field::FirstName | Field::LastName => {
      if chars < MIN_NAME_CHARS {
        Some(ViolationKind::TooShort)
      } else if !NAME_RE.is_match(value) {
        Some(ViolationKind::InvalidCharacters)
      } else {
        None
      }
    }
    Field::Email => (!EMAIL_RE.is_match(value)).then_some(ViolationKind::InvalidEmail),
    Field::Subject => (chars < MIN_SUBJECT_CHARS).then_some(ViolationKind::TooShort),
    Field::Message => (chars < MIN_MESSAGE_CHARS).then_some(ViolationKind::TooShort),
  }
}

/// Collapse violations into the single rejection message the endpoint sends.
///
/// Missing fields win over everything else, so a wholly empty submission says
/// "fill in all required fields" rather than listing every shape problem.
/// After that: email, names, subject, message. `None` when there is nothing
/// to report.
pub fn general_message(violations: &[FieldViolation]) -> Option<&'static str> {
  if violations.is_empty() {
    return None;
  }
  if violations.iter().any(|v| v.kind == ViolationKind::Required) {
    return Some(REQUIRED_MESSAGE);
  }
  let has = |field: Field| violations.iter().any(|v| v.field == field);
  let message = if has(Field::Email) {
    EMAIL_MESSAGE
  } else if has(Field::FirstName) || has(Field::LastName) {
    NAME_MESSAGE
  } else if has(Field::Subject) {
    SUBJECT_MESSAGE
  } else {
    MESSAGE_MESSAGE
  };
  Some(message)
}
