// Game board widget: one column per category, one cell per question.
//
// Open cells show their value; answered cells are filled with the color of
// the team that answered correctly, or the incorrect color.

use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;
use trivia_core::board::{CellView, ColumnView};
use trivia_core::{CellId, CellState};

use crate::tui::widgets::{text_on, to_color};
use crate::tui::ViewState;

/// Tallest a board row is drawn.
const MAX_ROW_HEIGHT: u16 = 3;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let board = &state.snapshot.board;
    let block = Block::default().borders(Borders::ALL).title(" Board ");

    if board.columns.is_empty() {
        frame.render_widget(block, area);
        return;
    }

    let rows = board.max_rows();
    let height = row_height(area.height, rows);
    let n = u32::try_from(board.columns.len()).unwrap_or(u32::MAX);
    let widths: Vec<Constraint> = board.columns.iter().map(|_| Constraint::Ratio(1, n)).collect();

    let header = Row::new(board.columns.iter().map(header_cell))
        .height(1)
        .style(Style::default().add_modifier(Modifier::BOLD));

    let body: Vec<Row> = (0..rows)
        .map(|position| {
            let cells = board.columns.iter().map(|column| {
                board_cell(column, position, state.board_cursor, height)
            });
            Row::new(cells).height(height)
        })
        .collect();

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);
}

/// Split the space under the header evenly, between 1 and
/// [`MAX_ROW_HEIGHT`] lines per row.
pub fn row_height(area_height: u16, rows: usize) -> u16 {
    // borders and header
    let available = area_height.saturating_sub(3);
    let rows = u16::try_from(rows.max(1)).unwrap_or(u16::MAX);
    (available / rows).clamp(1, MAX_ROW_HEIGHT)
}

fn header_cell(column: &ColumnView) -> Cell<'_> {
    Cell::from(Text::from(Line::from(column.header.as_str()).alignment(Alignment::Center)))
        .style(Style::default().fg(Color::Yellow))
}

fn board_cell(column: &ColumnView, position: usize, cursor: CellId, height: u16) -> Cell<'_> {
    // Categories may have fewer questions than the tallest column
    let Some(view) = column.cells.get(position) else {
        return Cell::from("");
    };

    let selected = view.id == cursor;
    let mut lines: Vec<Line> = (0..(height.saturating_sub(1) / 2))
        .map(|_| Line::default())
        .collect();
    lines.push(Line::from(cell_text(view, selected)).alignment(Alignment::Center));

    Cell::from(Text::from(lines)).style(cell_style(view, selected))
}

fn cell_text(view: &CellView, selected: bool) -> String {
    if selected {
        format!("[ {} ]", view.label)
    } else {
        view.label.clone()
    }
}

pub fn cell_style(view: &CellView, selected: bool) -> Style {
    let style = match view.state {
        CellState::Open => Style::default().fg(Color::Yellow).bg(Color::Blue),
        CellState::Answered(resolution) => {
            let color = resolution.color();
            Style::default()
                .fg(text_on(color))
                .bg(to_color(color))
                .add_modifier(Modifier::DIM)
        }
    };
    if selected {
        style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        style.add_modifier(Modifier::BOLD)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
