// Status bar widget: screen, current turn, board progress, pending load.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use trivia_core::Screen;

use crate::tui::widgets::to_color;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [screen] [turn] [progress] [loading]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let snap = &state.snapshot;
    let mut spans = vec![
        Span::styled(
            " TRIVIA ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(screen_label(snap.screen), Style::default().fg(Color::White)),
    ];

    match snap.screen {
        Screen::Setup => {
            spans.push(separator());
            spans.push(Span::styled(
                format!("{} teams", snap.setup_rows.len()),
                Style::default().fg(Color::White),
            ));
        }
        Screen::Play => {
            if let Some(active) = snap.scoreboard.iter().find(|e| e.active) {
                spans.push(separator());
                spans.push(Span::styled(
                    trivia_core::flow::turn_label(&active.name),
                    Style::default()
                        .fg(to_color(active.color))
                        .add_modifier(Modifier::BOLD),
                ));
            }
            spans.push(separator());
            spans.push(Span::styled(
                progress_label(snap.answered, snap.total),
                Style::default().fg(Color::White),
            ));
        }
    }

    if let Some(path) = &snap.loading {
        spans.push(separator());
        spans.push(Span::styled(
            format!("Loading {}...", path.display()),
            Style::default().fg(Color::Cyan),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

fn separator() -> Span<'static> {
    Span::styled(" | ", Style::default().fg(Color::Gray))
}

pub fn screen_label(screen: Screen) -> &'static str {
    match screen {
        Screen::Setup => "Team Setup",
        Screen::Play => "Game Board",
    }
}

/// e.g. "7/25 answered", or "Board complete" once every cell is done.
pub fn progress_label(answered: usize, total: usize) -> String {
    if total > 0 && answered >= total {
        "Board complete".to_string()
    } else {
        format!("{}/{} answered", answered, total)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
