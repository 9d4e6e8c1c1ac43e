use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GameRecordError {
    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StatsSnapshotError {
    #[error("lifetime correct ({correct}) exceeds lifetime total ({total})")]
    CorrectExceedsTotal { correct: u32, total: u32 },
}

/// Outcome of one completed game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    correct: u32,
    total: u32,
    played_at: DateTime<Utc>,
}

impl GameRecord {
    #[must_use]
    pub fn new(correct: u32, total: u32, played_at: DateTime<Utc>) -> Self {
        Self {
            correct,
            total,
            played_at,
        }
    }

    /// Placeholder best game before anything has been stored.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(0, 0, DateTime::UNIX_EPOCH)
    }

    /// Rehydrate a game record from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `GameRecordError::CorrectExceedsTotal` if the counts do not
    /// form a valid result.
    pub fn from_persisted(
        correct: u32,
        total: u32,
        played_at: DateTime<Utc>,
    ) -> Result<Self, GameRecordError> {
        if correct > total {
            return Err(GameRecordError::CorrectExceedsTotal { correct, total });
        }
        Ok(Self::new(correct, total, played_at))
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn played_at(&self) -> DateTime<Utc> {
        self.played_at
    }

    /// Per-game accuracy percentage; 0 for the zero placeholder.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * f64::from(self.correct) / f64::from(self.total)
        }
    }

    /// Whether this result displaces `incumbent` as the best game.
    ///
    /// Strictly higher accuracy wins; ratios are compared by
    /// cross-multiplication so ties are exact. Ties keep the incumbent,
    /// except that any played game beats the zero placeholder.
    #[must_use]
    pub fn beats(&self, incumbent: &GameRecord) -> bool {
        let lhs = u64::from(self.correct) * u64::from(incumbent.total);
        let rhs = u64::from(incumbent.correct) * u64::from(self.total);
        if lhs != rhs {
            return lhs > rhs;
        }
        incumbent.total == 0 && self.total > 0
    }
}

/// Lifetime statistics across all completed games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    correct: u32,
    total: u32,
    games_count: u32,
    best_game: GameRecord,
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self {
            correct: 0,
            total: 0,
            games_count: 0,
            best_game: GameRecord::zero(),
        }
    }
}

impl StatsSnapshot {
    /// Rehydrate a snapshot from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `StatsSnapshotError::CorrectExceedsTotal` if the lifetime
    /// counters do not align.
    pub fn from_persisted(
        correct: u32,
        total: u32,
        games_count: u32,
        best_game: GameRecord,
    ) -> Result<Self, StatsSnapshotError> {
        if correct > total {
            return Err(StatsSnapshotError::CorrectExceedsTotal { correct, total });
        }
        Ok(Self {
            correct,
            total,
            games_count,
            best_game,
        })
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn games_count(&self) -> u32 {
        self.games_count
    }

    #[must_use]
    pub fn best_game(&self) -> &GameRecord {
        &self.best_game
    }

    /// Fold one finished game into the lifetime totals and the best game.
    pub fn record_game(&mut self, game: &GameRecord) {
        if game.beats(&self.best_game) {
            self.best_game = game.clone();
        }
        self.correct = self.correct.saturating_add(game.correct());
        self.total = self.total.saturating_add(game.total());
        self.games_count = self.games_count.saturating_add(1);
    }

    /// Lifetime accuracy percentage; 0 before any questions were answered.
    #[must_use]
    pub fn total_accuracy(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * f64::from(self.correct) / f64::from(self.total)
        }
    }
}
