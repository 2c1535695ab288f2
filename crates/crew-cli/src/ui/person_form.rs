//! Add/edit form pane: right panel.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::form::{Field, PersonForm, image_label};

/// Render `form` into `area`. While `saving`, the form is dimmed.
pub fn draw(f: &mut Frame, area: Rect, title: &str, form: &PersonForm, saving: bool) {
  let block = Block::default()
    .title(if saving { format!("{title}(saving…) ") } else { title.to_owned() })
    .borders(Borders::ALL)
    .border_style(Style::default().fg(if saving { Color::DarkGray } else { Color::Cyan }));

  let mut lines: Vec<Line> = Vec::new();
  for field in Field::ALL {
    let focused = !saving && form.focused() == field;
    let label_style = if focused {
      Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };
    let required = if field == Field::Name { "*" } else { " " };

    let mut spans = vec![
      Span::styled(format!("{:<18}", format!("{}{required}", field.label())), label_style),
    ];
    spans.extend(value_spans(form, field, focused));
    lines.push(Line::from(spans));
  }

  f.render_widget(Paragraph::new(lines).block(block), area);
}

fn value_spans(form: &PersonForm, field: Field, focused: bool) -> Vec<Span<'static>> {
  let cursor = if focused { "▏" } else { "" };
  let text = |value: &str| Span::raw(format!("{value}{cursor}"));

  match field {
    Field::Department | Field::RoleLevel => {
      let value = if field == Field::Department { &form.department } else { &form.role_level };
      let shown = if value.is_empty() { "(none)" } else { value.as_str() };
      if focused {
        vec![Span::styled(
          format!("◂ {shown} ▸"),
          Style::default().add_modifier(Modifier::REVERSED),
        )]
      } else {
        vec![Span::raw(shown.to_owned())]
      }
    }
    Field::Hobbies => {
      let mut spans: Vec<Span> = form
        .hobbies
        .iter()
        .flat_map(|h| {
          [
            Span::styled(format!(" {h} "), Style::default().bg(Color::DarkGray)),
            Span::raw(" "),
          ]
        })
        .collect();
      spans.push(text(&form.hobby_input));
      spans
    }
    Field::Name => vec![text(&form.name)],
    Field::Specialty => vec![text(&form.specialty)],
    Field::ShortBio => vec![text(&form.short_bio)],
    Field::HowIGotInto => vec![text(&form.how_i_got_into)],
    Field::FunnyFact => vec![text(&form.funny_fact)],
    Field::StartDate if form.start_date.is_empty() && !focused => vec![Span::styled(
      "YYYY-MM-DD",
      Style::default().fg(Color::DarkGray),
    )],
    Field::StartDate => vec![text(&form.start_date)],
    Field::Location => vec![text(&form.location)],
    Field::ImageUrl => vec![text(&image_label(&form.image_url))],
  }
}
