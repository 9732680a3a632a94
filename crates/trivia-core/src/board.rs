// Board state and its render projection.
//
// The board holds one `CellState` per question in the bank. Rendering is a
// pure function of the bank and the cell states; nothing in the view is ever
// read back into the model.

use serde::{Deserialize, Serialize};

use crate::bank::{CellId, QuestionBank};
use crate::color::HexColor;

/// How an answered cell was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Answered correctly by the team at `team`; shown in that team's color.
    Correct { team: usize, color: HexColor },
    /// Answered incorrectly; shown in the fixed incorrect color.
    Incorrect { team: usize, color: HexColor },
}

impl Resolution {
    pub fn color(&self) -> HexColor {
        match self {
            Resolution::Correct { color, .. } | Resolution::Incorrect { color, .. } => *color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Open,
    /// Terminal: an answered cell is never reopened.
    Answered(Resolution),
}

impl CellState {
    pub fn is_answered(&self) -> bool {
        matches!(self, CellState::Answered(_))
    }
}

/// Per-cell state, shaped like the bank it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    columns: Vec<Vec<CellState>>,
}

impl Board {
    /// Build a fresh board with every cell open.
    pub fn build(bank: &QuestionBank) -> Self {
        let columns = bank
            .categories()
            .iter()
            .map(|c| vec![CellState::Open; c.questions.len()])
            .collect();
        Board { columns }
    }

    pub fn state(&self, cell: CellId) -> Option<CellState> {
        self.columns
            .get(cell.category)
            .and_then(|col| col.get(cell.position))
            .copied()
    }

    pub fn is_answered(&self, cell: CellId) -> bool {
        self.state(cell).is_some_and(|s| s.is_answered())
    }

    /// Mark a cell answered. Returns `false` (and changes nothing) when the
    /// cell does not exist or is already answered.
    pub fn mark_answered(&mut self, cell: CellId, resolution: Resolution) -> bool {
        match self
            .columns
            .get_mut(cell.category)
            .and_then(|col| col.get_mut(cell.position))
        {
            Some(state) if !state.is_answered() => {
                *state = CellState::Answered(resolution);
                true
            }
            _ => false,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.columns
            .iter()
            .flatten()
            .filter(|s| s.is_answered())
            .count()
    }

    pub fn cell_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() == self.cell_count()
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub id: CellId,
    /// Currency-formatted value, e.g. `$300`.
    pub label: String,
    pub state: CellState,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    pub header: String,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Number of cells in the tallest column.
    pub fn max_rows(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }

    pub fn cell(&self, id: CellId) -> Option<&CellView> {
        self.columns
            .get(id.category)
            .and_then(|c| c.cells.get(id.position))
    }
}

/// Project the bank and board into columns of labelled cells: one column
/// per category in bank order, one cell per question in list order.
pub fn render_board(bank: &QuestionBank, board: &Board, currency: &str) -> BoardView {
    let columns = bank
        .categories()
        .iter()
        .enumerate()
        .map(|(ci, category)| ColumnView {
            header: category.name.clone(),
            cells: category
                .questions
                .iter()
                .enumerate()
                .map(|(pi, q)| {
                    let id = CellId::new(ci, pi);
                    let state = board.state(id).unwrap_or_default();
                    CellView {
                        id,
                        label: format_currency(currency, q.value as i64),
                        state,
                        selectable: !state.is_answered(),
                    }
                })
                .collect(),
        })
        .collect();
    BoardView { columns }
}

/// Format a point value as money: `$500`, `-$200`.
pub fn format_currency(symbol: &str, amount: i64) -> String {
    if amount < 0 {
        format!("-{}{}", symbol, amount.unsigned_abs())
    } else {
        format!("{}{}", symbol, amount)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
