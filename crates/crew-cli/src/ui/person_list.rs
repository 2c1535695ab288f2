//! Person list pane: left panel, grouped by department.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState},
};

use super::department_color;
use crate::{app::App, state::Surface};

/// Render the grouped list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let groups = app.directory.groups();
  let total = app.directory.people().len();

  let block = Block::default()
    .title(format!(" People ({total}) "))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let open_id = match app.directory.surface() {
    Surface::Viewing(id) | Surface::Editing { id, .. } | Surface::Confirming { id, .. } => {
      Some(*id)
    }
    _ => None,
  };

  // Department headings are interleaved with people, so the cursor (an
  // index into people only) is mapped to its row here.
  let mut items: Vec<ListItem> = Vec::new();
  let mut selected_row = None;
  let mut index = 0;
  for group in &groups {
    let color = department_color(group.department);
    items.push(ListItem::new(Line::from(vec![Span::styled(
      format!("{} ({})", group.department, group.people.len()),
      Style::default().fg(color).add_modifier(Modifier::BOLD),
    )])));

    for person in &group.people {
      if index == app.list_cursor {
        selected_row = Some(items.len());
      }
      let marker = if open_id == Some(person.id) { "▸ " } else { "  " };
      let mut spans = vec![Span::raw(marker), Span::raw(person.profile.name.clone())];
      if let Some(role) = &person.profile.role_level {
        spans.push(Span::styled(
          format!("  {role}"),
          Style::default().fg(Color::DarkGray),
        ));
      }
      items.push(ListItem::new(Line::from(spans)));
      index += 1;
    }
  }

  if items.is_empty() {
    items.push(ListItem::new(Line::from(Span::styled(
      "No people yet. Press a to add one.",
      Style::default().fg(Color::DarkGray),
    ))));
  }

  let mut state = ListState::default();
  state.select(selected_row);

  f.render_stateful_widget(
    List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    area,
    &mut state,
  );
}
