// A running game: team rotation plus the question modal.

use tracing::{debug, info};

use crate::bank::{CellId, QuestionBank};
use crate::board::{format_currency, Board, Resolution};
use crate::color::HexColor;
use crate::flow::{
    score_delta, turn_label, ActiveQuestion, FlowError, Judgement, QuestionPhase, QuestionView,
};
use crate::setup::{SetupError, Team};
use crate::turn::{render_scoreboard, ScoreEntry, TurnOrder};

/// State that exists only while a game is being played. Created at start,
/// dropped at reset. The bank and board live beside it in the controller so
/// that they survive a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    turns: TurnOrder,
    phase: QuestionPhase,
}

impl Session {
    pub fn new(teams: Vec<Team>) -> Result<Self, SetupError> {
        Ok(Session {
            turns: TurnOrder::new(teams)?,
            phase: QuestionPhase::Closed,
        })
    }

    pub fn turns(&self) -> &TurnOrder {
        &self.turns
    }

    pub fn phase(&self) -> QuestionPhase {
        self.phase
    }

    pub fn current_team_index(&self) -> usize {
        self.turns.current_index()
    }

    pub fn current_team(&self) -> &Team {
        self.turns.current_team()
    }

    pub fn advance_turn(&mut self) -> usize {
        let next = self.turns.advance();
        debug!("Turn passes to '{}'", self.turns.current_team().name);
        next
    }

    /// Open the question at `cell`.
    ///
    /// Returns `false` without touching any state when the cell is answered,
    /// does not exist, or another question is already open.
    pub fn open_question(&mut self, bank: &QuestionBank, board: &Board, cell: CellId) -> bool {
        if !self.phase.is_closed() {
            debug!("Ignoring open of {:?}: a question is already open", cell);
            return false;
        }
        if board.is_answered(cell) {
            debug!("Ignoring open of {:?}: already answered", cell);
            return false;
        }
        let Some(question) = bank.get(cell) else {
            debug!("Ignoring open of {:?}: no such cell", cell);
            return false;
        };

        self.phase = QuestionPhase::Open(ActiveQuestion {
            cell,
            value: question.value,
        });
        info!(
            "Opened {}-point question {:?} for '{}'",
            question.value,
            cell,
            self.turns.current_team().name
        );
        true
    }

    /// Judge the open question: reveal the answer, apply `+value` or
    /// `-value` to the current team, and mark the cell answered.
    pub fn judge(
        &mut self,
        board: &mut Board,
        correct: bool,
        incorrect_color: HexColor,
    ) -> Result<Judgement, FlowError> {
        let QuestionPhase::Open(question) = self.phase else {
            return Err(FlowError::NotOpen);
        };

        let team = self.turns.current_index();
        let delta = score_delta(question.value, correct);
        let new_score = self.turns.apply_delta(delta);

        let resolution = if correct {
            Resolution::Correct {
                team,
                color: self.turns.current_team().color,
            }
        } else {
            Resolution::Incorrect {
                team,
                color: incorrect_color,
            }
        };
        board.mark_answered(question.cell, resolution);
        self.phase = QuestionPhase::Revealed { question, correct };

        info!(
            "'{}' answered {:?} {}: {:+} -> {}",
            self.turns.current_team().name,
            question.cell,
            if correct { "correctly" } else { "incorrectly" },
            delta,
            new_score
        );

        Ok(Judgement {
            cell: question.cell,
            team,
            correct,
            delta,
            new_score,
        })
    }

    /// Close the modal and pass the turn.
    ///
    /// The turn advances whether or not the question was judged. Closing an
    /// unjudged question leaves its cell open for a later pick.
    pub fn close_question(&mut self) -> Result<usize, FlowError> {
        if self.phase.is_closed() {
            return Err(FlowError::NothingToClose);
        }
        if let QuestionPhase::Open(q) = self.phase {
            debug!("Closing {:?} without a judgement", q.cell);
        }
        self.phase = QuestionPhase::Closed;
        Ok(self.advance_turn())
    }

    /// Drop the open question without passing the turn. Used when the board
    /// it points into is replaced.
    pub(crate) fn discard_question(&mut self) -> Option<ActiveQuestion> {
        let active = self.phase.active();
        self.phase = QuestionPhase::Closed;
        active
    }

    pub fn render_scoreboard(&self) -> Vec<ScoreEntry> {
        render_scoreboard(&self.turns)
    }

    /// Modal contents for the open question, if any.
    pub fn show_question(&self, bank: &QuestionBank, currency: &str) -> Option<QuestionView> {
        let active = self.phase.active()?;
        let record = bank.get(active.cell)?;
        let category = bank.categories().get(active.cell.category)?;
        let team = self.turns.current_team();
        Some(QuestionView {
            category: category.name.clone(),
            value_label: format_currency(currency, i64::from(record.value)),
            prompt: record.prompt.clone(),
            turn_label: turn_label(&team.name),
            turn_color: team.color,
            revealed: matches!(self.phase, QuestionPhase::Revealed { .. }),
        })
    }

    /// The answer text, visible only after judgement.
    pub fn show_answer<'a>(&self, bank: &'a QuestionBank) -> Option<&'a str> {
        match self.phase {
            QuestionPhase::Revealed { question, .. } => {
                bank.get(question.cell).map(|q| q.answer.as_str())
            }
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellState;

    const INCORRECT: HexColor = HexColor::new(0xf5, 0x65, 0x65);

    fn red_blue() -> Vec<Team> {
        vec![
            Team {
                name: "Red".into(),
                color: HexColor::new(0xff, 0, 0),
                score: 0,
            },
            Team {
                name: "Blue".into(),
                color: HexColor::new(0, 0, 0xff),
                score: 0,
            },
        ]
    }

    fn fixture() -> (Session, QuestionBank, Board) {
        let bank = QuestionBank::default();
        let board = Board::build(&bank);
        (Session::new(red_blue()).unwrap(), bank, board)
    }

    #[test]
    fn open_judge_close_cycle() {
        let (mut s, bank, mut board) = fixture();
        let cell = bank.cell("CSS Layouts", 0).unwrap();

        assert!(s.open_question(&bank, &board, cell));
        let view = s.show_question(&bank, "$").unwrap();
        assert_eq!(view.value_label, "$100");
        assert_eq!(view.turn_label, "Red's Turn");
        assert_eq!(view.category, "CSS Layouts");
        assert!(!view.revealed);
        assert_eq!(s.show_answer(&bank), None);

        let j = s.judge(&mut board, true, INCORRECT).unwrap();
        assert_eq!(j.delta, 100);
        assert_eq!(j.new_score, 100);
        assert_eq!(s.turns().teams()[0].score, 100);
        assert_eq!(
            board.state(cell),
            Some(CellState::Answered(Resolution::Correct {
                team: 0,
                color: HexColor::new(0xff, 0, 0)
            }))
        );
        assert_eq!(
            s.show_answer(&bank),
            Some("Use gap: 20px; on the flex container (super easy!)")
        );

        assert_eq!(s.close_question(), Ok(1));
        assert!(s.phase().is_closed());
        assert!(!s.open_question(&bank, &board, cell));
        assert!(s.phase().is_closed());
    }

    #[test]
    fn incorrect_subtracts_and_uses_alert_color() {
        let (mut s, bank, mut board) = fixture();
        let cell = CellId::new(0, 4);
        s.open_question(&bank, &board, cell);
        let j = s.judge(&mut board, false, INCORRECT).unwrap();
        assert_eq!(j.delta, -500);
        assert_eq!(s.turns().teams()[0].score, -500);
        match board.state(cell) {
            Some(CellState::Answered(r)) => assert_eq!(r.color(), INCORRECT),
            other => panic!("expected answered cell, got {other:?}"),
        }
    }

    #[test]
    fn judge_requires_open_question() {
        let (mut s, bank, mut board) = fixture();
        assert_eq!(s.judge(&mut board, true, INCORRECT), Err(FlowError::NotOpen));
        s.open_question(&bank, &board, CellId::new(0, 0));
        s.judge(&mut board, true, INCORRECT).unwrap();
        // Second judgement on the revealed question is refused.
        assert_eq!(s.judge(&mut board, false, INCORRECT), Err(FlowError::NotOpen));
        assert_eq!(s.turns().teams()[0].score, 100);
    }

    #[test]
    fn close_without_judgement_leaves_cell_open_and_advances() {
        let (mut s, bank, board) = fixture();
        let cell = CellId::new(2, 1);
        s.open_question(&bank, &board, cell);
        assert_eq!(s.close_question(), Ok(1));
        assert!(!board.is_answered(cell));
        assert!(s.open_question(&bank, &board, cell));
        assert_eq!(s.show_question(&bank, "$").unwrap().turn_label, "Blue's Turn");
    }

    #[test]
    fn close_while_closed_is_an_error() {
        let (mut s, _, _) = fixture();
        assert_eq!(s.close_question(), Err(FlowError::NothingToClose));
        assert_eq!(s.current_team_index(), 0);
    }

    #[test]
    fn only_one_question_open_at_a_time() {
        let (mut s, bank, board) = fixture();
        assert!(s.open_question(&bank, &board, CellId::new(0, 0)));
        assert!(!s.open_question(&bank, &board, CellId::new(1, 0)));
        assert_eq!(s.phase().active().unwrap().cell, CellId::new(0, 0));
    }

    #[test]
    fn open_out_of_range_is_ignored() {
        let (mut s, bank, board) = fixture();
        assert!(!s.open_question(&bank, &board, CellId::new(7, 0)));
        assert!(s.phase().is_closed());
    }

    #[test]
    fn discard_keeps_turn() {
        let (mut s, bank, board) = fixture();
        s.open_question(&bank, &board, CellId::new(0, 0));
        assert!(s.discard_question().is_some());
        assert!(s.phase().is_closed());
        assert_eq!(s.current_team_index(), 0);
    }
}
