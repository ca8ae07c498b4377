//! TUI rendering: header, the five fields, submit row, banner, status bar.

use chrono::Local;
use missive_core::Field;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};
use strum::IntoEnumIterator as _;

use crate::{
  app::{App, FormView},
  client::Transport,
  controller::{Banner, LifecycleState},
};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<T: Transport + 'static>(f: &mut Frame, app: &App<T>) {
  let area = f.area();
  let view = app.view.lock();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // fields
      Constraint::Length(1), // submit
      Constraint::Length(3), // banner
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_fields(f, rows[1], app, &view);
  draw_submit(f, rows[2], &view);
  draw_banner(f, rows[3], view.banner.as_ref());
  draw_status(f, rows[4], app.state());
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<T>(f: &mut Frame, area: Rect, app: &App<T>) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let left = Span::styled(
    format!(" missive → {}", app.endpoint),
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(format!("{date} "), Style::default().fg(Color::DarkGray));

  let pad = area
    .width
    .saturating_sub(left.content.chars().count() as u16)
    .saturating_sub(right.content.chars().count() as u16);

  let line = Line::from(vec![left, Span::raw(" ".repeat(pad as usize)), right]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Fields ───────────────────────────────────────────────────────────────────

fn draw_fields<T>(f: &mut Frame, area: Rect, app: &App<T>, view: &FormView) {
  // Each field is a bordered box plus one line for its inline error; the
  // message box takes whatever height is left.
  let constraints: Vec<Constraint> = Field::iter()
    .flat_map(|field| {
      let input = if field == Field::Message {
        Constraint::Min(3)
      } else {
        Constraint::Length(3)
      };
      [input, Constraint::Length(1)]
    })
    .collect();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints(constraints)
    .split(area);

  for (i, field) in Field::iter().enumerate() {
    let error = view.errors.get(&field).copied();
    draw_field(f, rows[i * 2], field, view.input.get(field), app.focus == field, error.is_some());
    if let Some(message) = error {
      f.render_widget(
        Paragraph::new(Span::styled(format!("  {message}"), Style::default().fg(Color::Red))),
        rows[i * 2 + 1],
      );
    }
  }
}

fn draw_field(f: &mut Frame, area: Rect, field: Field, value: &str, focused: bool, invalid: bool) {
  let border = match (invalid, focused) {
    (true, _) => Style::default().fg(Color::Red),
    (false, true) => Style::default().fg(Color::Yellow),
    (false, false) => Style::default().fg(Color::DarkGray),
  };

  let block = Block::default()
    .title(format!(" {} ", field.label()))
    .borders(Borders::ALL)
    .border_style(border);

  let mut text = value.to_string();
  if focused {
    text.push('▏');
  }

  f.render_widget(Paragraph::new(text).block(block).wrap(Wrap { trim: false }), area);
}

// ─── Submit row ───────────────────────────────────────────────────────────────

fn draw_submit(f: &mut Frame, area: Rect, view: &FormView) {
  let button = if view.busy {
    Span::styled(" [ Sending… ] ", Style::default().fg(Color::DarkGray))
  } else {
    Span::styled(
      " [ Send ] ",
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )
  };
  f.render_widget(Paragraph::new(Line::from(vec![Span::raw(" "), button])), area);
}

// ─── Banner ───────────────────────────────────────────────────────────────────

fn draw_banner(f: &mut Frame, area: Rect, banner: Option<&Banner>) {
  let Some(banner) = banner else {
    return;
  };

  let color = if banner.is_success() { Color::Green } else { Color::Red };
  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(color));

  f.render_widget(
    Paragraph::new(Span::styled(banner.message(), Style::default().fg(color)))
      .block(block)
      .wrap(Wrap { trim: true }),
    area,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, state: LifecycleState) {
  let hints = match state {
    LifecycleState::Submitting => "Sending… further submits are ignored  Esc quit",
    _ => "Tab/↑↓ move  Enter next  Enter on Message or Ctrl-S send  Esc quit",
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {} ", state.label()),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw("  "),
    Span::styled(hints, Style::default().fg(Color::Gray)),
  ]);

  f.render_widget(Paragraph::new(line), area);
}
