// Team registry: editable team rows collected before a game starts.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::color::HexColor;
use crate::game::DEFAULT_PALETTE;

/// Fewest teams a game can be played with.
pub const MIN_TEAMS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("need at least {minimum} teams")]
    TooFewTeams { minimum: usize },

    #[error("no team row at index {index}")]
    NoSuchRow { index: usize },

    #[error("a game is already in progress")]
    GameInProgress,
}

/// A team as it exists during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub color: HexColor,
    /// Unbounded signed score. Incorrect answers can push it below zero.
    pub score: i64,
}

/// One editable row on the setup screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRow {
    pub name: String,
    pub color: HexColor,
}

/// The setup-time list of team rows.
#[derive(Debug, Clone)]
pub struct TeamSetup {
    rows: Vec<TeamRow>,
    palette: Vec<HexColor>,
    rng: StdRng,
}

impl TeamSetup {
    /// Create a setup list with `initial_rows` default rows (never fewer than
    /// [`MIN_TEAMS`]). The first rows take palette colors in order so the
    /// starting teams are distinguishable; later rows pick at random.
    ///
    /// An empty `palette` is replaced by [`DEFAULT_PALETTE`].
    pub fn new(palette: Vec<HexColor>, initial_rows: usize, rng: StdRng) -> Self {
        let palette = if palette.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            palette
        };
        let rows = (0..initial_rows.max(MIN_TEAMS))
            .map(|i| TeamRow {
                name: default_team_name(i + 1),
                color: palette[i % palette.len()],
            })
            .collect();
        TeamSetup { rows, palette, rng }
    }

    pub fn rows(&self) -> &[TeamRow] {
        &self.rows
    }

    /// Append a row named `Team N` with a random palette color. Duplicate
    /// colors are allowed.
    pub fn add_row(&mut self) -> &TeamRow {
        let color = self
            .palette
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(HexColor::new(0x80, 0x80, 0x80));
        let row = TeamRow {
            name: default_team_name(self.rows.len() + 1),
            color,
        };
        debug!("Added team row '{}' ({})", row.name, row.color);
        self.rows.push(row);
        &self.rows[self.rows.len() - 1]
    }

    /// Remove a row, refusing when that would leave fewer than
    /// [`MIN_TEAMS`] rows.
    pub fn remove_row(&mut self, index: usize) -> Result<TeamRow, SetupError> {
        if index >= self.rows.len() {
            return Err(SetupError::NoSuchRow { index });
        }
        if self.rows.len() <= MIN_TEAMS {
            return Err(SetupError::TooFewTeams { minimum: MIN_TEAMS });
        }
        Ok(self.rows.remove(index))
    }

    pub fn rename_row(&mut self, index: usize, name: impl Into<String>) -> Result<(), SetupError> {
        let row = self.row_mut(index)?;
        row.name = name.into();
        Ok(())
    }

    pub fn set_row_color(&mut self, index: usize, color: HexColor) -> Result<(), SetupError> {
        self.row_mut(index)?.color = color;
        Ok(())
    }

    /// Step a row's color to the next palette entry. A color that is not in
    /// the palette moves to the first entry.
    pub fn cycle_row_color(&mut self, index: usize) -> Result<HexColor, SetupError> {
        let next = {
            let current = self.row(index)?.color;
            let pos = self.palette.iter().position(|c| *c == current);
            match pos {
                Some(p) => self.palette[(p + 1) % self.palette.len()],
                None => self.palette[0],
            }
        };
        self.row_mut(index)?.color = next;
        Ok(next)
    }

    /// Turn the rows into teams for a new game.
    ///
    /// Names are trimmed and rows with blank names are skipped. Fails without
    /// side effects when fewer than [`MIN_TEAMS`] named rows remain.
    pub fn commit(&self) -> Result<Vec<Team>, SetupError> {
        let teams: Vec<Team> = self
            .rows
            .iter()
            .filter_map(|row| {
                let name = row.name.trim();
                (!name.is_empty()).then(|| Team {
                    name: name.to_string(),
                    color: row.color,
                    score: 0,
                })
            })
            .collect();

        if teams.len() < MIN_TEAMS {
            return Err(SetupError::TooFewTeams { minimum: MIN_TEAMS });
        }
        Ok(teams)
    }

    /// Discard all edits and return to the initial rows.
    pub fn reset(&mut self, initial_rows: usize) {
        let palette = std::mem::take(&mut self.palette);
        let rng = self.rng.clone();
        *self = TeamSetup::new(palette, initial_rows, rng);
    }

    fn row(&self, index: usize) -> Result<&TeamRow, SetupError> {
        self.rows.get(index).ok_or(SetupError::NoSuchRow { index })
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut TeamRow, SetupError> {
        self.rows.get_mut(index).ok_or(SetupError::NoSuchRow { index })
    }
}

fn default_team_name(n: usize) -> String {
    format!("Team {}", n)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
