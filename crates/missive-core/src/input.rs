//! The submitted record and its field identifiers.

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};

// ─── Field ───────────────────────────────────────────────────────────────────

/// One of the five fixed form fields, in form order.
///
/// The `strum` serialisation is the wire name used in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum Field {
  #[strum(serialize = "f_name")]
  FirstName,
  #[strum(serialize = "l_name")]
  LastName,
  #[strum(serialize = "email")]
  Email,
  #[strum(serialize = "subject")]
  Subject,
  #[strum(serialize = "message")]
  Message,
}

impl Field {
  /// Name of the field in a form-encoded or multipart request body.
  pub fn wire_name(self) -> &'static str { self.into() }

  /// Look a field up by its wire name.
  pub fn from_wire_name(name: &str) -> Option<Self> {
    use strum::IntoEnumIterator as _;
    Self::iter().find(|f| f.wire_name() == name)
  }

  /// Human-readable label for UIs.
  pub fn label(self) -> &'static str {
    match self {
      Field::FirstName => "First name",
      Field::LastName => "Last name",
      Field::Email => "Email",
      Field::Subject => "Subject",
      Field::Message => "Message",
    }
  }
}

// ─── SubmissionInput ─────────────────────────────────────────────────────────

/// The five free-text fields of a contact-form submission.
///
/// Deserialises from the wire names (`f_name`, `l_name`, ...). Absent fields
/// become empty strings rather than a deserialisation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionInput {
  #[serde(rename = "f_name")]
  pub first_name: String,
  #[serde(rename = "l_name")]
  pub last_name:  String,
  pub email:      String,
  pub subject:    String,
  pub message:    String,
}

impl SubmissionInput {
  /// Build an input from raw values, trimming each of them.
  pub fn new(
    first_name: impl AsRef<str>,
    last_name: impl AsRef<str>,
    email: impl AsRef<str>,
    subject: impl AsRef<str>,
    message: impl AsRef<str>,
  ) -> Self {
    Self {
      first_name: first_name.as_ref().trim().to_string(),
      last_name:  last_name.as_ref().trim().to_string(),
      email:      email.as_ref().trim().to_string(),
      subject:    subject.as_ref().trim().to_string(),
      message:    message.as_ref().trim().to_string(),
    }
  }

  /// A copy with surrounding whitespace removed from every field.
  pub fn trimmed(&self) -> Self {
    Self::new(
      &self.first_name,
      &self.last_name,
      &self.email,
      &self.subject,
      &self.message,
    )
  }

  pub fn get(&self, field: Field) -> &str {
    match field {
      Field::FirstName => &self.first_name,
      Field::LastName => &self.last_name,
      Field::Email => &self.email,
      Field::Subject => &self.subject,
      Field::Message => &self.message,
    }
  }

  pub fn get_mut(&mut self, field: Field) -> &mut String {
    match field {
      Field::FirstName => &mut self.first_name,
      Field::LastName => &mut self.last_name,
      Field::Email => &mut self.email,
      Field::Subject => &mut self.subject,
      Field::Message => &mut self.message,
    }
  }

  /// Set a field by wire name. Unknown names are ignored and reported as
  /// `false`.
  pub fn set_wire(&mut self, name: &str, value: impl Into<String>) -> bool {
    match Field::from_wire_name(name) {
      Some(field) => {
        *self.get_mut(field) = value.into();
        true
      }
      None => false,
    }
  }

  /// `(wire name, value)` pairs in form order, for encoding a request body.
  pub fn wire_pairs(&self) -> Vec<(&'static str, &str)> {
    use strum::IntoEnumIterator as _;
    Field::iter().map(|f| (f.wire_name(), self.get(f))).collect()
  }

  /// Empty every field.
  pub fn clear(&mut self) { *self = Self::default(); }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_trims_every_field() {
    let input = SubmissionInput::new("  Ann ", "\tLee", " a@b.c ", " Hi ", "\n body \n");
    assert_eq!(input.first_name, "Ann");
    assert_eq!(input.last_name, "Lee");
    assert_eq!(input.email, "a@b.c");
    assert_eq!(input.subject, "Hi");
    assert_eq!(input.message, "body");
  }

  #[test]
  fn deserialises_wire_names_with_missing_fields_empty() {
    let input: SubmissionInput =
      serde_json::from_str(r#"{"f_name":"Ann","email":"ann@example.com"}"#)
        .unwrap();
    assert_eq!(input.first_name, "Ann");
    assert_eq!(input.last_name, "");
    assert_eq!(input.email, "ann@example.com");
    assert_eq!(input.message, "");
  }

  #[test]
  fn wire_pairs_follow_form_order() {
    let input = SubmissionInput::new("Ann", "Lee", "e@x.io", "Subj", "Body text");
    let names: Vec<_> = input.wire_pairs().into_iter().map(|(k, _)| k).collect();
    assert_eq!(names, ["f_name", "l_name", "email", "subject", "message"]);
  }

  #[test]
  fn set_wire_ignores_unknown_names() {
    let mut input = SubmissionInput::default();
    assert!(input.set_wire("l_name", "Lee"));
    assert!(!input.set_wire("phone", "555"));
    assert_eq!(input.last_name, "Lee");
  }
}
