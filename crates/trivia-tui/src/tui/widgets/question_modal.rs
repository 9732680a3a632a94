// Question modal: the open question drawn over the board.
//
// Shows whose turn it is, the prompt, and once judged the answer.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use trivia_core::QuestionView;

use crate::tui::widgets::confirm::centered_rect;
use crate::tui::widgets::to_color;
use crate::tui::ViewState;

const MODAL_MAX_WIDTH: u16 = 72;
const MODAL_HEIGHT: u16 = 14;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(question) = &state.snapshot.question else {
        return;
    };

    let width = MODAL_MAX_WIDTH.min(area.width.saturating_sub(4).max(area.width / 2));
    let modal = centered_rect(width, MODAL_HEIGHT, area);
    frame.render_widget(Clear, modal);

    let turn_color = to_color(question.turn_color);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(turn_color))
        .title(Span::styled(
            format!(" {} · {} ", question.category, question.value_label),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let answer = state.snapshot.answer.as_deref();
    let paragraph = Paragraph::new(modal_lines(question, answer))
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, modal);
}

/// Body text of the modal. `answer` is only given once the question has
/// been judged.
pub fn modal_lines<'a>(question: &'a QuestionView, answer: Option<&'a str>) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(
            question.turn_label.as_str(),
            Style::default()
                .fg(to_color(question.turn_color))
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            question.prompt.as_str(),
            Style::default().fg(Color::White),
        )),
        Line::default(),
    ];

    match answer {
        Some(answer) => {
            lines.push(Line::from(vec![
                Span::styled("Answer: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    answer,
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::default());
            lines.push(hint_line(&[("Enter", "close")]));
        }
        None => {
            lines.push(hint_line(&[
                ("y", "correct"),
                ("n", "incorrect"),
                ("Esc", "close"),
            ]));
        }
    }
    lines
}

fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            *key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}", action),
            Style::default().fg(Color::Gray),
        ));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
