// Custom question loading: error type, load summary, and the generation
// counter that discards stale asynchronous reads.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bank::{BankError, QuestionBank};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Bank(#[from] BankError),

    #[error("load #{generation} superseded by load #{latest}")]
    Stale { generation: u64, latest: u64 },
}

/// Shape of a successfully loaded bank, for the success notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub categories: usize,
    pub questions: usize,
}

impl LoadSummary {
    pub fn of(bank: &QuestionBank) -> Self {
        LoadSummary {
            categories: bank.category_count(),
            questions: bank.question_count(),
        }
    }
}

/// Identifies one requested load. Only the ticket from the most recent
/// request may complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadTicket {
    pub generation: u64,
}

/// Monotonic counter of requested loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTracker {
    latest: u64,
}

impl LoadTracker {
    /// Issue a ticket for a new load, superseding any in flight.
    pub fn begin(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket {
            generation: self.latest,
        }
    }

    /// Check that `ticket` is still the newest request.
    pub fn check(&self, ticket: LoadTicket) -> Result<(), LoadError> {
        if ticket.generation == self.latest {
            Ok(())
        } else {
            Err(LoadError::Stale {
                generation: ticket.generation,
                latest: self.latest,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_wins() {
        let mut tracker = LoadTracker::default();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(tracker.check(second).is_ok());
        match tracker.check(first) {
            Err(LoadError::Stale { generation, latest }) => {
                assert_eq!(generation, 1);
                assert_eq!(latest, 2);
            }
            other => panic!("expected Stale, got {other:?}"),
        }
    }

    #[test]
    fn summary_counts_bank() {
        let summary = LoadSummary::of(&QuestionBank::default());
        assert_eq!(summary.categories, 5);
        assert_eq!(summary.questions, 25);
    }
}
