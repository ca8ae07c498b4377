//! Form state and key dispatch for the terminal UI.

use std::{
  collections::HashMap,
  sync::{Arc, Mutex, MutexGuard},
};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use missive_core::{Field, FieldViolation, SubmissionInput};
use strum::IntoEnumIterator as _;

use crate::{
  client::Transport,
  controller::{Banner, LifecycleState, Renderer, SubmissionController},
};

// ─── FormView ─────────────────────────────────────────────────────────────────

/// Everything the form shows, written by the controller and the key handler.
#[derive(Debug, Default)]
pub struct FormView {
  pub input:  SubmissionInput,
  /// Inline error per invalid field.
  pub errors: HashMap<Field, &'static str>,
  pub banner: Option<Banner>,
  pub busy:   bool,
}

/// A [`FormView`] shared between the UI thread and submission tasks.
#[derive(Debug, Clone, Default)]
pub struct SharedView(Arc<Mutex<FormView>>);

impl SharedView {
  pub fn lock(&self) -> MutexGuard<'_, FormView> {
    self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl Renderer for SharedView {
  fn clear_messages(&self) {
    let mut view = self.lock();
    view.errors.clear();
    view.banner = None;
  }

  fn show_violation(&self, violation: &FieldViolation) {
    self.lock().errors.insert(violation.field, violation.message);
  }

  fn set_busy(&self, busy: bool) { self.lock().busy = busy; }

  // The banner pane is always on screen, so showing it is enough.
  fn show_banner(&self, banner: &Banner) { self.lock().banner = Some(banner.clone()); }

  fn clear_fields(&self) { self.lock().input.clear(); }
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<T> {
  /// Field with keyboard focus.
  pub focus:      Field,
  pub view:       SharedView,
  pub controller: Arc<SubmissionController<T, SharedView>>,
  /// Where submissions go, shown in the header.
  pub endpoint:   String,
}

impl<T: Transport + 'static> App<T> {
  pub fn new(transport: T, timeout: std::time::Duration, endpoint: impl Into<String>) -> Self {
    let view = SharedView::default();
    Self {
      focus: Field::FirstName,
      controller: Arc::new(SubmissionController::new(transport, view.clone(), timeout)),
      view,
      endpoint: endpoint.into(),
    }
  }

  pub fn state(&self) -> LifecycleState { self.controller.state() }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Handle a key event. Returns `false` if the app should exit.
  pub fn handle_key(&mut self, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
      KeyCode::Char('c') if ctrl => return false,
      KeyCode::Esc => return false,
      KeyCode::Char('s') if ctrl => self.submit(),
      KeyCode::Tab | KeyCode::Down => self.focus = next(self.focus),
      KeyCode::BackTab | KeyCode::Up => self.focus = prev(self.focus),
      KeyCode::Enter if self.focus == Field::Message => self.submit(),
      KeyCode::Enter => self.focus = next(self.focus),
      KeyCode::Backspace => {
        self.edit(|value| {
          value.pop();
        });
      }
      KeyCode::Char(c) if !ctrl => self.edit(|value| value.push(c)),
      _ => {}
    }
    true
  }

  /// Edit the focused field. Editing a field drops its inline error.
  fn edit(&self, f: impl FnOnce(&mut String)) {
    let mut view = self.view.lock();
    f(view.input.get_mut(self.focus));
    view.errors.remove(&self.focus);
  }

  /// Start a submission in the background. The controller ignores it if one
  /// is already outstanding.
  pub fn submit(&self) {
    let controller = Arc::clone(&self.controller);
    let input = self.view.lock().input.clone();
    tokio::spawn(async move {
      let outcome = controller.on_submit(&input).await;
      tracing::debug!(?outcome, "submit gesture handled");
    });
  }
}

fn next(field: Field) -> Field {
  let fields: Vec<Field> = Field::iter().collect();
  let i = fields.iter().position(|f| *f == field).unwrap_or(0);
  fields[(i + 1) % fields.len()]
}

fn prev(field: Field) -> Field {
  let fields: Vec<Field> = Field::iter().collect();
  let i = fields.iter().position(|f| *f == field).unwrap_or(0);
  fields[(i + fields.len() - 1) % fields.len()]
}

#[cfg(test)]
mod tests {
  use std::time::Duration;

  use missive_core::validate::NAME_MESSAGE;

  use super::*;
  use crate::test_support::{FakeTransport, Script};

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn app(scripts: Vec<Script>) -> App<FakeTransport> {
    App::new(FakeTransport::new(scripts), Duration::from_secs(1), "http://test/contact")
  }

  fn type_str(app: &mut App<FakeTransport>, s: &str) {
    for c in s.chars() {
      app.handle_key(key(KeyCode::Char(c)));
    }
  }

  #[test]
  fn focus_wraps_in_both_directions() {
    assert_eq!(next(Field::Message), Field::FirstName);
    assert_eq!(prev(Field::FirstName), Field::Message);
    assert_eq!(next(Field::FirstName), Field::LastName);
  }

  #[tokio::test]
  async fn typing_fills_the_focused_field() {
    let mut app = app(vec![]);
    type_str(&mut app, "Ann");
    app.handle_key(key(KeyCode::Tab));
    type_str(&mut app, "Leex");
    app.handle_key(key(KeyCode::Backspace));

    let view = app.view.lock();
    assert_eq!(view.input.first_name, "Ann");
    assert_eq!(view.input.last_name, "Lee");
  }

  #[tokio::test]
  async fn editing_a_field_clears_only_its_error() {
    let mut app = app(vec![]);
    app.view.lock().errors.insert(Field::FirstName, NAME_MESSAGE);
    app.view.lock().errors.insert(Field::Email, "bad");
    app.handle_key(key(KeyCode::Char('A')));

    let view = app.view.lock();
    assert!(!view.errors.contains_key(&Field::FirstName));
    assert!(view.errors.contains_key(&Field::Email));
  }

  #[tokio::test]
  async fn escape_and_ctrl_c_quit() {
    let mut app = app(vec![]);
    assert!(!app.handle_key(key(KeyCode::Esc)));
    assert!(!app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
  }

  #[tokio::test]
  async fn successful_submit_clears_the_form() {
    let mut app = app(vec![Script::Reply(200, r#"{"success":true,"message":"Thanks!"}"#)]);
    *app.view.lock() = FormView {
      input: crate::test_support::scenario_a(),
      ..FormView::default()
    };
    app.focus = Field::Message;
    app.handle_key(key(KeyCode::Enter));

    for _ in 0..100 {
      if app.view.lock().banner.is_some() {
        break;
      }
      tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let view = app.view.lock();
    assert_eq!(view.banner, Some(Banner::Success("Thanks!".into())));
    assert_eq!(view.input, SubmissionInput::default());
    assert!(!view.busy);
  }
}
