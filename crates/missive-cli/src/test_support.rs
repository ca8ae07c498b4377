//! Scripted transports and a recording renderer for controller tests.

use std::{
  collections::VecDeque,
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use missive_core::{Field, FieldViolation, SubmissionInput};

use crate::{
  client::{RawResponse, Transport, TransportError},
  controller::{Banner, Renderer},
};

pub fn scenario_a() -> SubmissionInput {
  SubmissionInput::new(
    "Ann",
    "Lee",
    "ann@example.com",
    "Hello there",
    "This is a valid message body.",
  )
}

// ─── Transport ────────────────────────────────────────────────────────────────

/// What the fake transport does for one call.
pub enum Script {
  Reply(u16, &'static str),
  Owned(u16, String),
  Delayed(Duration, u16, &'static str),
  Hang(Duration),
  Fail,
}

/// Plays back one [`Script`] per call, counting calls.
pub struct FakeTransport {
  scripts: Mutex<VecDeque<Script>>,
  calls:   AtomicUsize,
}

impl FakeTransport {
  pub fn new(scripts: Vec<Script>) -> Self {
    Self { scripts: Mutex::new(scripts.into()), calls: AtomicUsize::new(0) }
  }

  pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

impl Transport for FakeTransport {
  async fn send(&self, _input: &SubmissionInput) -> Result<RawResponse, TransportError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    let script = self.scripts.lock().unwrap().pop_front().expect("unscripted call");
    let reply = |status: u16, body: &str| RawResponse { status, body: body.as_bytes().to_vec() };
    match script {
      Script::Reply(status, body) => Ok(reply(status, body)),
      Script::Owned(status, body) => Ok(reply(status, &body)),
      Script::Delayed(delay, status, body) => {
        tokio::time::sleep(delay).await;
        Ok(reply(status, body))
      }
      Script::Hang(delay) => {
        tokio::time::sleep(delay).await;
        Ok(reply(200, r#"{"success":true,"message":"too late"}"#))
      }
      Script::Fail => Err(TransportError::Connection("connection refused".into())),
    }
  }
}

// ─── Renderer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
  Cleared,
  Violation(Field),
  Busy(bool),
  Banner(Banner),
  FieldsCleared,
}

#[derive(Default)]
pub struct RecordingRenderer {
  events: Mutex<Vec<Event>>,
}

impl RecordingRenderer {
  pub fn events(&self) -> Vec<Event> { self.events.lock().unwrap().clone() }

  pub fn count(&self, event: &Event) -> usize {
    self.events.lock().unwrap().iter().filter(|e| *e == event).count()
  }

  pub fn last_banner(&self) -> Option<Banner> {
    self.events.lock().unwrap().iter().rev().find_map(|e| match e {
      Event::Banner(b) => Some(b.clone()),
      _ => None,
    })
  }

  fn push(&self, event: Event) { self.events.lock().unwrap().push(event); }
}

impl Renderer for RecordingRenderer {
  fn clear_messages(&self) { self.push(Event::Cleared); }

  fn show_violation(&self, violation: &FieldViolation) {
    self.push(Event::Violation(violation.field));
  }

  fn set_busy(&self, busy: bool) { self.push(Event::Busy(busy)); }

  fn show_banner(&self, banner: &Banner) { self.push(Event::Banner(banner.clone())); }

  fn clear_fields(&self) { self.push(Event::FieldsCleared); }
}
