//! Line-oriented renderer for `missive send`.

use std::io::{self, Write as _};

use missive_core::FieldViolation;

use crate::controller::{Banner, Renderer};

/// Writes violations and failures to stderr and the success banner to stdout.
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
  // Nothing from a previous attempt is on screen to remove.
  fn clear_messages(&self) {}

  fn show_violation(&self, violation: &FieldViolation) {
    eprintln!("  {}: {}", violation.field.label(), violation.message);
  }

  fn set_busy(&self, busy: bool) {
    if busy {
      eprint!("Sending… ");
      let _ = io::stderr().flush();
    } else {
      eprintln!();
    }
  }

  fn show_banner(&self, banner: &Banner) {
    match banner {
      Banner::Success(m) => println!("✔ {m}"),
      Banner::Danger(m) => eprintln!("✖ {m}"),
    }
  }

  fn clear_fields(&self) {}
}
