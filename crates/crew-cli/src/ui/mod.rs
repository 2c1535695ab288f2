//! TUI rendering: orchestrates all panes.

pub mod person_detail;
pub mod person_form;
pub mod person_list;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::{app::App, state::Surface};

/// Accent colour per department; unknown departments are grey.
pub fn department_color(department: &str) -> Color {
  match department {
    "Upper Management" => Color::Red,
    "Product Development" => Color::Blue,
    "Marketing" => Color::Green,
    "Human Resources" => Color::Magenta,
    "Customer Support" => Color::LightBlue,
    "Finance" => Color::LightMagenta,
    "Operations" => Color::LightRed,
    "Design" => Color::Cyan,
    "Engineering" => Color::LightGreen,
    "IT" => Color::LightCyan,
    "Research & Development" => Color::Magenta,
    "Legal" => Color::Red,
    "Public Relations" => Color::Yellow,
    "Quality Assurance" => Color::Green,
    _ => Color::Gray,
  }
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  if let Surface::Confirming { id, .. } = app.directory.surface() {
    let name = app
      .directory
      .person(*id)
      .map(|p| p.profile.name.as_str())
      .unwrap_or("this person");
    draw_confirm(f, area, name, app.directory.is_saving());
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let left = Span::styled(
    " crew  [a] add  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{} ", app.client.base_url()),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.width() as u16;
  let right_width = right.width() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
    .split(area);

  person_list::draw(f, cols[0], app);

  // The confirmation dialog draws over whatever it was opened from.
  let surface = match app.directory.surface() {
    Surface::Confirming { previous, .. } => previous.as_ref(),
    other => other,
  };

  match surface {
    Surface::Viewing(id) => match app.directory.person(*id) {
      Some(person) => person_detail::draw(f, cols[1], person, app.detail_scroll),
      None => draw_empty_detail(f, cols[1]),
    },
    Surface::Adding(form) => {
      person_form::draw(f, cols[1], " New person ", form, app.directory.is_saving());
    }
    Surface::Editing { form, .. } => {
      person_form::draw(f, cols[1], " Edit person ", form, app.directory.is_saving());
    }
    Surface::Closed | Surface::Confirming { .. } => draw_empty_detail(f, cols[1]),
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      "Select a person and press Enter.",
      Style::default().fg(Color::DarkGray),
    )])),
    inner,
  );
}

// ─── Confirm dialog ───────────────────────────────────────────────────────────

fn draw_confirm(f: &mut Frame, area: Rect, name: &str, busy: bool) {
  let [row] = Layout::vertical([Constraint::Length(5)])
    .flex(Flex::Center)
    .areas(area);
  let [popup] = Layout::horizontal([Constraint::Length(48)])
    .flex(Flex::Center)
    .areas(row);

  let block = Block::default()
    .title(" Delete ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Red));

  let prompt = if busy {
    Line::from(Span::styled("Deleting…", Style::default().fg(Color::DarkGray)))
  } else {
    Line::from(vec![
      Span::styled("[y] ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
      Span::raw("delete   "),
      Span::styled("[n] ", Style::default().add_modifier(Modifier::BOLD)),
      Span::raw("keep"),
    ])
  };
  let text = vec![Line::from(format!("Delete {name}?")), Line::from(""), prompt];

  f.render_widget(Clear, popup);
  f.render_widget(
    Paragraph::new(text)
      .block(block)
      .wrap(Wrap { trim: true }),
    popup,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match app.directory.surface() {
    Surface::Closed => ("LIST", "↑↓/jk navigate  Enter detail  a add  r reload  q quit"),
    Surface::Viewing(_) => (
      "DETAIL",
      "↑↓/jk scroll  e edit  d delete  [ prev  ] next  Esc back",
    ),
    Surface::Adding(_) | Surface::Editing { .. } => (
      "FORM",
      "Tab/↑↓ field  ←→ choose  Enter add hobby  Ctrl-S save  Esc cancel",
    ),
    Surface::Confirming { .. } => ("CONFIRM", "y delete  n keep"),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::DarkGray),
  );

  let line = Line::from(vec![mode_span, hint_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
