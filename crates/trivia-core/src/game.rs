// Game controller: the single owner of all game state.
//
// Holds the question bank and board (which survive a reset), the setup rows,
// and the session that exists only while a game is being played. Every user
// action goes through a method here; every view is a projection from here.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::bank::{BankError, CellId, QuestionBank};
use crate::board::{render_board, Board, BoardView};
use crate::color::HexColor;
use crate::flow::{FlowError, Judgement, QuestionView};
use crate::loader::{LoadError, LoadSummary, LoadTicket, LoadTracker};
use crate::session::Session;
use crate::setup::{SetupError, TeamRow, TeamSetup, MIN_TEAMS};
use crate::turn::ScoreEntry;

/// Team colors offered on the setup screen.
pub const DEFAULT_PALETTE: [HexColor; 8] = [
    HexColor::new(0x49, 0x49, 0xb4),
    HexColor::new(0x7b, 0xef, 0xd3),
    HexColor::new(0xf7, 0x7d, 0x2b),
    HexColor::new(0xf5, 0x65, 0x65),
    HexColor::new(0x9f, 0x7a, 0xea),
    HexColor::new(0xed, 0x64, 0xa6),
    HexColor::new(0x42, 0x99, 0xe1),
    HexColor::new(0x38, 0xb2, 0xac),
];

/// Color of a cell answered incorrectly.
pub const DEFAULT_INCORRECT_COLOR: HexColor = HexColor::new(0xf5, 0x65, 0x65);

/// Presentation and setup parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rules {
    pub palette: Vec<HexColor>,
    pub incorrect_color: HexColor,
    pub currency_symbol: String,
    pub initial_teams: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            palette: DEFAULT_PALETTE.to_vec(),
            incorrect_color: DEFAULT_INCORRECT_COLOR,
            currency_symbol: "$".to_string(),
            initial_teams: MIN_TEAMS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Setup,
    Play,
}

pub struct Game {
    rules: Rules,
    bank: QuestionBank,
    board: Board,
    setup: TeamSetup,
    session: Option<Session>,
    reset_pending: bool,
    loads: LoadTracker,
}

impl Game {
    /// A game on the built-in board.
    pub fn new(rules: Rules) -> Self {
        Self::with_bank(rules, QuestionBank::default(), StdRng::from_entropy())
    }

    /// A game on `bank`, with a caller-supplied RNG for team colors.
    pub fn with_bank(mut rules: Rules, bank: QuestionBank, rng: StdRng) -> Self {
        if rules.palette.is_empty() {
            rules.palette = DEFAULT_PALETTE.to_vec();
        }
        let board = Board::build(&bank);
        let setup = TeamSetup::new(rules.palette.clone(), rules.initial_teams, rng);
        Game {
            rules,
            bank,
            board,
            setup,
            session: None,
            reset_pending: false,
            loads: LoadTracker::default(),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn screen(&self) -> Screen {
        if self.session.is_some() {
            Screen::Play
        } else {
            Screen::Setup
        }
    }

    pub fn is_reset_pending(&self) -> bool {
        self.reset_pending
    }

    // -- Setup --------------------------------------------------------------

    pub fn setup_rows(&self) -> &[TeamRow] {
        self.setup.rows()
    }

    pub fn add_team_row(&mut self) -> &TeamRow {
        self.setup.add_row()
    }

    pub fn remove_team_row(&mut self, index: usize) -> Result<TeamRow, SetupError> {
        self.setup.remove_row(index)
    }

    pub fn rename_team_row(&mut self, index: usize, name: &str) -> Result<(), SetupError> {
        self.setup.rename_row(index, name)
    }

    pub fn set_team_color(&mut self, index: usize, color: HexColor) -> Result<(), SetupError> {
        self.setup.set_row_color(index, color)
    }

    pub fn cycle_team_color(&mut self, index: usize) -> Result<HexColor, SetupError> {
        self.setup.cycle_row_color(index)
    }

    /// Commit the setup rows and enter play with the first team up and a
    /// fresh board. Leaves everything untouched on failure.
    pub fn start_game(&mut self) -> Result<(), SetupError> {
        if self.session.is_some() {
            return Err(SetupError::GameInProgress);
        }
        let teams = self.setup.commit()?;
        let names: Vec<&str> = teams.iter().map(|t| t.name.as_str()).collect();
        info!("Starting game with {} teams: {}", teams.len(), names.join(", "));
        self.session = Some(Session::new(teams)?);
        self.board = Board::build(&self.bank);
        Ok(())
    }

    // -- Play ---------------------------------------------------------------

    /// Open the question at `cell`. Returns whether a question was opened;
    /// answered cells, unknown cells, an already-open question and the setup
    /// screen all make this a no-op.
    pub fn open_question(&mut self, cell: CellId) -> bool {
        match self.session.as_mut() {
            Some(session) => session.open_question(&self.bank, &self.board, cell),
            None => false,
        }
    }

    /// [`Game::open_question`] addressed by category name.
    pub fn open_question_at(&mut self, category: &str, position: usize) -> bool {
        match self.bank.cell(category, position) {
            Some(cell) => self.open_question(cell),
            None => false,
        }
    }

    pub fn judge(&mut self, correct: bool) -> Result<Judgement, FlowError> {
        let session = self.session.as_mut().ok_or(FlowError::NoGame)?;
        let judgement = session.judge(&mut self.board, correct, self.rules.incorrect_color)?;
        if self.board.is_complete() {
            let leader = session.turns().leader();
            info!(
                "Board complete; '{}' leads with {}",
                leader.name, leader.score
            );
        }
        Ok(judgement)
    }

    /// Close the question modal and pass the turn. Returns the new current
    /// team index.
    pub fn close_question(&mut self) -> Result<usize, FlowError> {
        self.session
            .as_mut()
            .ok_or(FlowError::NoGame)?
            .close_question()
    }

    pub fn advance_turn(&mut self) -> Result<usize, FlowError> {
        Ok(self.session.as_mut().ok_or(FlowError::NoGame)?.advance_turn())
    }

    pub fn current_team_index(&self) -> Option<usize> {
        self.session.as_ref().map(Session::current_team_index)
    }

    // -- Projections --------------------------------------------------------

    pub fn render_board(&self) -> BoardView {
        render_board(&self.bank, &self.board, &self.rules.currency_symbol)
    }

    /// Empty on the setup screen.
    pub fn render_scoreboard(&self) -> Vec<ScoreEntry> {
        self.session
            .as_ref()
            .map(Session::render_scoreboard)
            .unwrap_or_default()
    }

    pub fn show_question(&self) -> Option<QuestionView> {
        self.session
            .as_ref()?
            .show_question(&self.bank, &self.rules.currency_symbol)
    }

    pub fn show_answer(&self) -> Option<&str> {
        self.session.as_ref()?.show_answer(&self.bank)
    }

    // -- Reset --------------------------------------------------------------

    /// Ask for a reset. Nothing changes until [`Game::confirm_reset`].
    pub fn request_reset(&mut self) -> Result<(), FlowError> {
        if self.session.is_none() {
            return Err(FlowError::NoGame);
        }
        self.reset_pending = true;
        Ok(())
    }

    pub fn cancel_reset(&mut self) {
        self.reset_pending = false;
    }

    /// Drop the session and return to setup. Teams and scores are discarded;
    /// the loaded bank is kept and the board rebuilt from it.
    pub fn confirm_reset(&mut self) -> Result<(), FlowError> {
        if !self.reset_pending {
            return Err(FlowError::NoResetPending);
        }
        self.reset_pending = false;
        self.session = None;
        self.setup.reset(self.rules.initial_teams);
        self.board = Board::build(&self.bank);
        info!("Game reset; back to team setup");
        Ok(())
    }

    // -- Custom questions ---------------------------------------------------

    /// Parse `raw` and, if it is a valid question document, replace the bank
    /// and rebuild the board. On error the bank and board are untouched.
    pub fn load_custom_questions(&mut self, raw: &str) -> Result<LoadSummary, BankError> {
        let bank = QuestionBank::from_json(raw).inspect_err(|e| {
            warn!("Rejected custom questions: {}", e);
        })?;
        Ok(self.replace_bank(bank))
    }

    /// Start an asynchronous load. The returned ticket must accompany the
    /// file contents to [`Game::finish_load`].
    pub fn begin_load(&mut self) -> LoadTicket {
        self.loads.begin()
    }

    /// Complete an asynchronous load. Completions for anything but the most
    /// recent [`Game::begin_load`] are discarded as stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        contents: Result<String, LoadError>,
    ) -> Result<LoadSummary, LoadError> {
        if let Err(e) = self.loads.check(ticket) {
            warn!("Discarding question file: {}", e);
            return Err(e);
        }
        let raw = contents?;
        Ok(self.load_custom_questions(&raw)?)
    }

    fn replace_bank(&mut self, bank: QuestionBank) -> LoadSummary {
        if let Some(discarded) = self.session.as_mut().and_then(Session::discard_question) {
            warn!("Closed question {:?} because the board was replaced", discarded.cell);
        }
        self.bank = bank;
        self.board = Board::build(&self.bank);
        let summary = LoadSummary::of(&self.bank);
        info!(
            "Loaded custom questions: {} categories, {} questions",
            summary.categories, summary.questions
        );
        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
