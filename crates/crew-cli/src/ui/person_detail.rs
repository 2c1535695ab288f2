//! Person detail pane: right panel.

use crew_core::person::{Person, parse_start_date};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use super::department_color;
use crate::form::image_label;

/// Render `person` into `area`, scrolled down by `scroll` lines.
pub fn draw(f: &mut Frame, area: Rect, person: &Person, scroll: u16) {
  let p = &person.profile;

  let block = Block::default()
    .title(format!(" {} ", p.name))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let mut lines: Vec<Line> = Vec::new();

  // Badges: department and role level.
  let mut badges = Vec::new();
  if let Some(department) = &p.department {
    badges.push(Span::styled(
      format!(" {department} "),
      Style::default()
        .fg(Color::Black)
        .bg(department_color(department)),
    ));
  }
  if let Some(role) = &p.role_level {
    badges.push(Span::raw(" "));
    badges.push(Span::styled(
      format!(" {role} "),
      Style::default().fg(Color::Black).bg(Color::Gray),
    ));
  }
  if !badges.is_empty() {
    lines.push(Line::from(badges));
    lines.push(Line::from(""));
  }

  field(&mut lines, "Specialty", p.specialty.as_deref());
  field(&mut lines, "Location", p.location.as_deref());
  let start = p.start_date.as_deref().map(format_start_date);
  field(&mut lines, "Start date", start.as_deref());
  let image = p.image_url.as_deref().map(image_label);
  field(&mut lines, "Image", image.as_deref());

  section(&mut lines, "About", p.short_bio.as_deref());
  section(&mut lines, "How I got into it", p.how_i_got_into.as_deref());
  section(&mut lines, "Funny fact", p.funny_fact.as_deref());

  if !p.hobbies.is_empty() {
    lines.push(Line::from(""));
    lines.push(heading("Hobbies"));
    lines.push(Line::from(
      p.hobbies
        .iter()
        .flat_map(|h| {
          [
            Span::styled(format!(" {h} "), Style::default().bg(Color::DarkGray)),
            Span::raw(" "),
          ]
        })
        .collect::<Vec<_>>(),
    ));
  }

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!(
      "added {}  updated {}",
      person.created_at.format("%Y-%m-%d"),
      person.updated_at.format("%Y-%m-%d %H:%M")
    ),
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(
    Paragraph::new(lines)
      .block(block)
      .wrap(Wrap { trim: false })
      .scroll((scroll, 0)),
    area,
  );
}

fn heading(label: &str) -> Line<'static> {
  Line::from(Span::styled(
    label.to_owned(),
    Style::default()
      .fg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  ))
}

fn field(lines: &mut Vec<Line<'static>>, label: &str, value: Option<&str>) {
  let Some(value) = value else { return };
  lines.push(Line::from(vec![
    Span::styled(
      format!("{label:<12}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::raw(value.to_owned()),
  ]));
}

fn section(lines: &mut Vec<Line<'static>>, label: &str, body: Option<&str>) {
  let Some(body) = body else { return };
  lines.push(Line::from(""));
  lines.push(heading(label));
  lines.push(Line::from(body.to_owned()));
}

/// Long-form date, e.g. "January 15, 2020". Unparsable input is shown as-is.
pub fn format_start_date(raw: &str) -> String {
  match parse_start_date(raw) {
    Some(date) => date.format("%B %-d, %Y").to_string(),
    None => raw.to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn start_date_is_long_form() {
    assert_eq!(format_start_date("2020-01-15"), "January 15, 2020");
    assert_eq!(format_start_date("2021-03-10T00:00:00Z"), "March 10, 2021");
    assert_eq!(format_start_date("soon"), "soon");
  }
}
