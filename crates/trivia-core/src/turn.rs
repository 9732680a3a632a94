// Turn rotation and score bookkeeping.

use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::setup::{SetupError, Team, MIN_TEAMS};

/// Teams in turn order plus the index of the team whose turn it is.
///
/// Rotation is strict round-robin: no skipping, no elimination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrder {
    teams: Vec<Team>,
    current: usize,
}

impl TurnOrder {
    /// Start rotation at the first team. Requires at least [`MIN_TEAMS`].
    pub fn new(teams: Vec<Team>) -> Result<Self, SetupError> {
        if teams.len() < MIN_TEAMS {
            return Err(SetupError::TooFewTeams { minimum: MIN_TEAMS });
        }
        Ok(TurnOrder { teams, current: 0 })
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_team(&self) -> &Team {
        &self.teams[self.current]
    }

    /// Move to the next team, wrapping after the last.
    pub fn advance(&mut self) -> usize {
        self.current = (self.current + 1) % self.teams.len();
        self.current
    }

    /// Add `delta` to the current team's score and return the new score.
    pub fn apply_delta(&mut self, delta: i64) -> i64 {
        let team = &mut self.teams[self.current];
        team.score += delta;
        team.score
    }

    /// Team with the highest score; ties go to the earlier team.
    pub fn leader(&self) -> &Team {
        self.teams
            .iter()
            .rev()
            .max_by_key(|t| t.score)
            .unwrap_or(&self.teams[0])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub color: HexColor,
    pub score: i64,
    pub active: bool,
}

/// Project each team's name, color and score, flagging whose turn it is.
pub fn render_scoreboard(turns: &TurnOrder) -> Vec<ScoreEntry> {
    turns
        .teams
        .iter()
        .enumerate()
        .map(|(idx, team)| ScoreEntry {
            name: team.name.clone(),
            color: team.color,
            score: team.score,
            active: idx == turns.current,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn teams(n: usize) -> Vec<Team> {
        (0..n)
            .map(|i| Team {
                name: format!("T{}", i),
                color: HexColor::new(i as u8, 0, 0),
                score: 0,
            })
            .collect()
    }

    #[test]
    fn rejects_single_team() {
        assert_eq!(
            TurnOrder::new(teams(1)),
            Err(SetupError::TooFewTeams { minimum: 2 })
        );
    }

    #[test]
    fn advance_is_round_robin() {
        for n in 2..=8 {
            let mut turns = TurnOrder::new(teams(n)).unwrap();
            for start in 0..n {
                assert_eq!(turns.current_index(), start);
                for _ in 0..n {
                    turns.advance();
                }
                assert_eq!(turns.current_index(), start, "closure failed for n={n}");
                turns.advance();
            }
        }
    }

    #[test]
    fn apply_delta_goes_negative() {
        let mut turns = TurnOrder::new(teams(2)).unwrap();
        assert_eq!(turns.apply_delta(-300), -300);
        assert_eq!(turns.apply_delta(100), -200);
        turns.advance();
        assert_eq!(turns.apply_delta(500), 500);
        assert_eq!(turns.teams()[0].score, -200);
    }

    #[test]
    fn scoreboard_marks_active_team() {
        let mut turns = TurnOrder::new(teams(3)).unwrap();
        turns.advance();
        turns.apply_delta(200);
        let board = render_scoreboard(&turns);
        assert_eq!(board.len(), 3);
        assert!(!board[0].active);
        assert!(board[1].active);
        assert_eq!(board[1].score, 200);
        assert_eq!(board[1].name, "T1");
    }

    #[test]
    fn leader_prefers_earlier_team_on_tie() {
        let mut turns = TurnOrder::new(teams(3)).unwrap();
        assert_eq!(turns.leader().name, "T0");
        turns.advance();
        turns.apply_delta(100);
        turns.advance();
        turns.apply_delta(100);
        assert_eq!(turns.leader().name, "T1");
    }
}
