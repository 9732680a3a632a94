// Question modal lifecycle: Closed -> Open -> Revealed -> Closed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bank::CellId;
use crate::color::HexColor;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("no game in progress")]
    NoGame,

    #[error("no question is open for judging")]
    NotOpen,

    #[error("no question is open")]
    NothingToClose,

    #[error("no reset is awaiting confirmation")]
    NoResetPending,
}

/// The question currently shown in the modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuestion {
    pub cell: CellId,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QuestionPhase {
    #[default]
    Closed,
    /// Prompt visible, awaiting judgement.
    Open(ActiveQuestion),
    /// Judged; the answer is visible.
    Revealed {
        question: ActiveQuestion,
        correct: bool,
    },
}

impl QuestionPhase {
    pub fn active(&self) -> Option<ActiveQuestion> {
        match self {
            QuestionPhase::Closed => None,
            QuestionPhase::Open(q) | QuestionPhase::Revealed { question: q, .. } => Some(*q),
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, QuestionPhase::Closed)
    }
}

/// Outcome of judging the open question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    pub cell: CellId,
    pub team: usize,
    pub correct: bool,
    /// `+value` when correct, `-value` otherwise.
    pub delta: i64,
    pub new_score: i64,
}

/// What the modal shows for the open question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub category: String,
    pub value_label: String,
    pub prompt: String,
    /// e.g. "Red's Turn".
    pub turn_label: String,
    pub turn_color: HexColor,
    pub revealed: bool,
}

pub fn turn_label(team_name: &str) -> String {
    format!("{}'s Turn", team_name)
}

pub(crate) fn score_delta(value: u32, correct: bool) -> i64 {
    let value = i64::from(value);
    if correct {
        value
    } else {
        -value
    }
}
