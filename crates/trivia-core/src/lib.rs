// Game rules for the team trivia board: question bank, team setup, board
// state, turn rotation, the question modal lifecycle, and custom question
// loading. Contains no presentation code; front ends drive a `Game` and
// render its projections.

pub mod bank;
pub mod board;
pub mod color;
pub mod flow;
pub mod game;
pub mod loader;
pub mod session;
pub mod setup;
pub mod turn;

pub use bank::{BankError, CellId, QuestionBank, QuestionRecord};
pub use board::{BoardView, CellState, Resolution};
pub use color::HexColor;
pub use flow::{FlowError, Judgement, QuestionPhase, QuestionView};
pub use game::{Game, Rules, Screen};
pub use loader::{LoadError, LoadSummary, LoadTicket};
pub use setup::{SetupError, Team, TeamRow};
pub use turn::ScoreEntry;
