// Notice line: the file path prompt while it is open, otherwise the last
// message from the app.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::NoticeLevel;
use crate::tui::{InputMode, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = if let InputMode::LoadPath { buffer } = &state.input_mode {
        Line::from(vec![
            Span::styled(
                " Question file: ",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(buffer.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else if let Some(notice) = &state.notice {
        let (marker, color) = match notice.level {
            NoticeLevel::Info => ("✓", Color::Green),
            NoticeLevel::Error => ("✗", Color::Red),
        };
        Line::from(vec![Span::styled(
            format!(" {} {}", marker, notice.text),
            Style::default().fg(color),
        )])
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Notice;

    fn rendered(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn shows_error_notice() {
        let mut state = ViewState::default();
        state.notice = Some(Notice::error("need at least 2 teams"));
        assert!(rendered(&state).contains("need at least 2 teams"));
    }

    #[test]
    fn prompt_takes_precedence_over_notice() {
        let mut state = ViewState::default();
        state.notice = Some(Notice::info("old news"));
        state.input_mode = InputMode::LoadPath {
            buffer: "quiz.json".into(),
        };
        let text = rendered(&state);
        assert!(text.contains("Question file: quiz.json"));
        assert!(!text.contains("old news"));
    }

    #[test]
    fn empty_when_nothing_to_say() {
        let state = ViewState::default();
        assert!(rendered(&state).trim().is_empty());
    }
}
