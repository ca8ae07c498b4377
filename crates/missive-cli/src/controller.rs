//! Client-side submission lifecycle.
//!
//! A [`SubmissionController`] owns the lifecycle of one form: it validates
//! locally, sends at most one request at a time through a [`Transport`], and
//! turns whatever comes back into either inline field errors or exactly one
//! banner on its [`Renderer`].

use std::{
  sync::{Mutex, MutexGuard},
  time::Duration,
};

use missive_core::{FieldViolation, Reply, SubmissionInput, validate};

use crate::client::{RawResponse, Transport, TransportError};

/// Shown for an accepted submission whose reply carries no message.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Your message was sent successfully!";

/// Shown for a rejection whose reply carries no message.
pub const DEFAULT_REJECTED_MESSAGE: &str = "An error occurred while sending your message.";

/// Shown for a non-2xx response without a readable reply.
pub const SEND_ERROR_MESSAGE: &str =
  "An error occurred while sending your message. Please try again later.";

pub const MALFORMED_RESPONSE_MESSAGE: &str =
  "Could not process the server response. Please try again later.";

pub const CONNECTION_MESSAGE: &str =
  "Connection error. Please check your internet connection and try again.";

pub const TIMEOUT_MESSAGE: &str = "The server took too long to respond. Please try again later.";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ─── Lifecycle ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
  /// Local validation failed; nothing was sent.
  Invalid,
  /// The server answered and declined.
  Rejected,
  /// A 2xx response whose body is not a reply.
  MalformedResponse,
  /// The request never produced a response.
  Transport,
  Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
  #[default]
  Idle,
  Validating,
  Submitting,
  Succeeded,
  Failed(FailureReason),
}

impl LifecycleState {
  pub fn label(&self) -> &'static str {
    match self {
      LifecycleState::Idle => "IDLE",
      LifecycleState::Validating => "VALIDATING",
      LifecycleState::Submitting => "SENDING",
      LifecycleState::Succeeded => "SENT",
      LifecycleState::Failed(_) => "FAILED",
    }
  }
}

/// What a call to [`SubmissionController::on_submit`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
  /// A submission was already outstanding; nothing happened.
  Ignored,
  /// The attempt ran to this terminal state.
  Finished(LifecycleState),
}

/// The one terminal message of an attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
  Success(String),
  Danger(String),
}

impl Banner {
  pub fn message(&self) -> &str {
    match self {
      Banner::Success(m) | Banner::Danger(m) => m,
    }
  }

  pub fn is_success(&self) -> bool { matches!(self, Banner::Success(_)) }
}

// ─── Renderer ─────────────────────────────────────────────────────────────────

/// The UI side of the controller.
pub trait Renderer: Send + Sync {
  /// Remove every inline error and the banner.
  fn clear_messages(&self);

  /// Mark one field invalid and show its message next to it.
  fn show_violation(&self, violation: &FieldViolation);

  /// Toggle the busy indicator and the submit affordance.
  fn set_busy(&self, busy: bool);

  /// Show the banner and bring it into view.
  fn show_banner(&self, banner: &Banner);

  /// Reset every field to empty.
  fn clear_fields(&self);
}

// ─── Controller ───────────────────────────────────────────────────────────────

pub struct SubmissionController<T, R> {
  transport: T,
  renderer:  R,
  timeout:   Duration,
  state:     Mutex<LifecycleState>,
}

impl<T: Transport, R: Renderer> SubmissionController<T, R> {
  pub fn new(transport: T, renderer: R, timeout: Duration) -> Self {
    Self { transport, renderer, timeout, state: Mutex::new(LifecycleState::Idle) }
  }

  pub fn state(&self) -> LifecycleState { *self.lock() }

  #[cfg(test)]
  pub fn renderer(&self) -> &R { &self.renderer }

  #[cfg(test)]
  pub fn transport(&self) -> &T { &self.transport }

  /// Run one submission attempt for `input`.
  ///
  /// Returns [`SubmitOutcome::Ignored`] without touching the UI while another
  /// attempt is outstanding.
  pub async fn on_submit(&self, input: &SubmissionInput) -> SubmitOutcome {
    // Claiming the Submitting state and validating happen under one lock so
    // two gestures can never both pass the guard.
    let violations = {
      let mut state = self.lock();
      if *state == LifecycleState::Submitting {
        tracing::debug!("submission already outstanding; ignoring");
        return SubmitOutcome::Ignored;
      }
      transition(&mut state, LifecycleState::Validating);
      let violations = validate(input);
      let next = if violations.is_empty() {
        LifecycleState::Submitting
      } else {
        LifecycleState::Failed(FailureReason::Invalid)
      };
      transition(&mut state, next);
      violations
    };

    self.renderer.clear_messages();

    if !violations.is_empty() {
      tracing::info!(count = violations.len(), "submission halted by validation");
      for violation in &violations {
        self.renderer.show_violation(violation);
      }
      return SubmitOutcome::Finished(LifecycleState::Failed(FailureReason::Invalid));
    }

    self.renderer.set_busy(true);
    let in_flight = InFlight { state: &self.state, renderer: &self.renderer, armed: true };
    let resolution = tokio::time::timeout(self.timeout, self.transport.send(input)).await;
    in_flight.settle();

    let (terminal, banner) = match resolution {
      Ok(result) => resolve(result),
      Err(_) => {
        tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "submission timed out");
        (
          LifecycleState::Failed(FailureReason::Timeout),
          Banner::Danger(TIMEOUT_MESSAGE.to_string()),
        )
      }
    };

    transition(&mut self.lock(), terminal);
    self.renderer.show_banner(&banner);

    if terminal == LifecycleState::Succeeded {
      self.renderer.clear_fields();
      transition(&mut self.lock(), LifecycleState::Idle);
    }

    SubmitOutcome::Finished(terminal)
  }

  fn lock(&self) -> MutexGuard<'_, LifecycleState> {
    self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

/// Held while a request is outstanding. Dropping it without [`settle`]
/// (the `on_submit` future was cancelled) returns the controller to `Idle`
/// and re-enables submit.
///
/// [`settle`]: InFlight::settle
struct InFlight<'a, R: Renderer> {
  state:    &'a Mutex<LifecycleState>,
  renderer: &'a R,
  armed:    bool,
}

impl<R: Renderer> InFlight<'_, R> {
  /// The request resolved; clear the busy indicator and let the caller
  /// record the terminal state.
  fn settle(mut self) {
    self.armed = false;
    self.renderer.set_busy(false);
  }
}

impl<R: Renderer> Drop for InFlight<'_, R> {
  fn drop(&mut self) {
    if !self.armed {
      return;
    }
    tracing::debug!("submission cancelled while outstanding");
    let mut state = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if *state == LifecycleState::Submitting {
      transition(&mut state, LifecycleState::Idle);
    }
    drop(state);
    self.renderer.set_busy(false);
  }
}

fn transition(state: &mut LifecycleState, next: LifecycleState) {
  let from = *state;
  tracing::debug!(?from, to = ?next, "lifecycle transition");
  *state = next;
}

/// Map a transport result onto a terminal state and its banner.
fn resolve(result: Result<RawResponse, TransportError>) -> (LifecycleState, Banner) {
  let response = match result {
    Ok(response) => response,
    Err(e) => {
      tracing::warn!(error = %e, "submission transport failed");
      return (
        LifecycleState::Failed(FailureReason::Transport),
        Banner::Danger(CONNECTION_MESSAGE.to_string()),
      );
    }
  };

  let reply = Reply::from_slice(&response.body);

  if !response.is_success() {
    tracing::warn!(status = response.status, "submission answered with an error status");
    let message = match reply {
      Ok(reply) if !reply.message.is_empty() => reply.message,
      _ => SEND_ERROR_MESSAGE.to_string(),
    };
    return (LifecycleState::Failed(FailureReason::Rejected), Banner::Danger(message));
  }

  match reply {
    Ok(reply) if reply.success => {
      (LifecycleState::Succeeded, Banner::Success(or_default(reply.message, DEFAULT_SUCCESS_MESSAGE)))
    }
    Ok(reply) => (
      LifecycleState::Failed(FailureReason::Rejected),
      Banner::Danger(or_default(reply.message, DEFAULT_REJECTED_MESSAGE)),
    ),
    Err(e) => {
      tracing::warn!(error = %e, "unreadable submission reply");
      (
        LifecycleState::Failed(FailureReason::MalformedResponse),
        Banner::Danger(MALFORMED_RESPONSE_MESSAGE.to_string()),
      )
    }
  }
}

fn or_default(message: String, default: &str) -> String {
  if message.is_empty() { default.to_string() } else { message }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
