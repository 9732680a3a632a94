// Team setup widget: editable team rows with their colors.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;
use trivia_core::TeamRow;

use crate::tui::widgets::{text_on, to_color};
use crate::tui::{InputMode, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let rows = &state.snapshot.setup_rows;
    let editing = match &state.input_mode {
        InputMode::EditName { index, buffer } => Some((*index, buffer.as_str())),
        _ => None,
    };

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let name = match editing {
                Some((index, buffer)) if index == i => RowName::Editing(buffer),
                _ => RowName::Fixed(&row.name),
            };
            ListItem::new(row_line(i, row, name))
        })
        .collect();

    let title = format!(" Teams ({}) ", rows.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    if !rows.is_empty() {
        list_state.select(Some(state.setup_cursor));
    }
    frame.render_stateful_widget(list, area, &mut list_state);
}

enum RowName<'a> {
    Fixed(&'a str),
    Editing(&'a str),
}

fn row_line<'a>(index: usize, row: &TeamRow, name: RowName<'a>) -> Line<'a> {
    let swatch = Span::styled(
        format!(" {} ", row.color),
        Style::default()
            .fg(text_on(row.color))
            .bg(to_color(row.color)),
    );
    let mut spans = vec![
        Span::styled(format!("{:>2}. ", index + 1), Style::default().fg(Color::Gray)),
        swatch,
        Span::raw("  "),
    ];
    match name {
        RowName::Fixed(n) if n.trim().is_empty() => spans.push(Span::styled(
            "(no name, skipped)",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
        RowName::Fixed(n) => spans.push(Span::styled(n, Style::default().fg(Color::White))),
        RowName::Editing(buf) => {
            spans.push(Span::styled(
                buf,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::UNDERLINED),
            ));
            spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        }
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
