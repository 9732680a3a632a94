// Message types passed between the TUI and the app orchestrator.

use std::path::PathBuf;

use trivia_core::{BoardView, CellId, LoadError, LoadTicket, QuestionView, ScoreEntry, Screen, TeamRow};

// ---------------------------------------------------------------------------
// TUI -> app
// ---------------------------------------------------------------------------

/// Commands sent from the TUI to the app orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    // Setup screen
    AddTeam,
    RemoveTeam(usize),
    RenameTeam { index: usize, name: String },
    CycleTeamColor(usize),
    StartGame,

    // Play screen
    OpenQuestion(CellId),
    Judge { correct: bool },
    CloseQuestion,
    RequestReset,
    ConfirmReset,
    CancelReset,

    /// Read a custom question file. Valid on either screen.
    LoadQuestions(PathBuf),
    Quit,
}

// ---------------------------------------------------------------------------
// app -> TUI
// ---------------------------------------------------------------------------

/// Updates pushed from the app orchestrator to the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiUpdate {
    /// Everything the TUI draws, rebuilt after each state change.
    StateSnapshot(Box<AppSnapshot>),
    /// One-line message for the notice bar.
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            text: text.into(),
        }
    }
}

/// Full projection of the game for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSnapshot {
    pub screen: Screen,
    pub setup_rows: Vec<TeamRow>,
    pub board: BoardView,
    /// Empty on the setup screen.
    pub scoreboard: Vec<ScoreEntry>,
    /// The open question, if any.
    pub question: Option<QuestionView>,
    /// Answer text, only once the open question has been judged.
    pub answer: Option<String>,
    pub reset_pending: bool,
    pub answered: usize,
    pub total: usize,
    /// Prefix for scores, e.g. "$".
    pub currency_symbol: String,
    /// Question file currently being read.
    pub loading: Option<PathBuf>,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        AppSnapshot {
            screen: Screen::Setup,
            setup_rows: Vec::new(),
            board: BoardView::default(),
            scoreboard: Vec::new(),
            question: None,
            answer: None,
            reset_pending: false,
            answered: 0,
            total: 0,
            currency_symbol: "$".to_string(),
            loading: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Background load -> app
// ---------------------------------------------------------------------------

/// Completion of a spawned question-file read.
#[derive(Debug)]
pub struct LoadEvent {
    pub ticket: LoadTicket,
    pub path: PathBuf,
    pub result: Result<String, LoadError>,
}
