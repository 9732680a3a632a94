// Scoreboard widget: one box per team, the team up highlighted.

use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;
use trivia_core::board::format_currency;
use trivia_core::ScoreEntry;

use crate::tui::widgets::to_color;
use crate::tui::ViewState;

/// Render the scoreboard into the given area.
///
/// On the setup screen there are no teams yet and the zone shows a hint.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let entries = &state.snapshot.scoreboard;
    if entries.is_empty() {
        let hint = Paragraph::new("Add teams below, then press s to start")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title("Scores"));
        frame.render_widget(hint, area);
        return;
    }

    let n = u32::try_from(entries.len()).unwrap_or(u32::MAX);
    let constraints = entries.iter().map(|_| Constraint::Ratio(1, n));
    let boxes = Layout::horizontal(constraints).split(area);

    for (entry, rect) in entries.iter().zip(boxes.iter()) {
        let paragraph = Paragraph::new(score_line(entry, &state.snapshot.currency_symbol))
            .alignment(Alignment::Center)
            .block(team_block(entry));
        frame.render_widget(paragraph, *rect);
    }
}

fn team_block(entry: &ScoreEntry) -> Block<'static> {
    let color = to_color(entry.color);
    let (border_type, title_style) = if entry.active {
        (
            BorderType::Thick,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    } else {
        (BorderType::Plain, Style::default().fg(color))
    };
    let title = if entry.active {
        format!("▶ {}", entry.name)
    } else {
        entry.name.clone()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(color))
        .title(Span::styled(title, title_style))
}

pub fn score_line(entry: &ScoreEntry, currency: &str) -> Line<'static> {
    let style = if entry.score < 0 {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::White)
    };
    Line::from(Span::styled(
        format_currency(currency, entry.score),
        style.add_modifier(Modifier::BOLD),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
