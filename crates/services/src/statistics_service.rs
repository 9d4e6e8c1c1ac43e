use std::sync::Arc;

use quiz_core::model::{GameRecord, StatsSnapshot};
use storage::repository::StatsRepository;

use crate::error::StatisticsError;

/// Result of folding a finished game into the persisted statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    pub snapshot: StatsSnapshot,
    /// False when the write failed and the snapshot is in-memory only.
    pub persisted: bool,
}

/// Persists game outcomes and serves the derived lifetime metrics.
#[derive(Clone)]
pub struct StatisticsService {
    stats: Arc<dyn StatsRepository>,
}

impl StatisticsService {
    #[must_use]
    pub fn new(stats: Arc<dyn StatsRepository>) -> Self {
        Self { stats }
    }

    /// Current persisted snapshot; zero-value defaults before the first game.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::Storage` when the backend cannot be read.
    pub async fn snapshot(&self) -> Result<StatsSnapshot, StatisticsError> {
        Ok(self.stats.load().await?)
    }

    /// Fold a finished game into the lifetime statistics, best-effort.
    ///
    /// Persistence failures are reported through the `persisted` flag and a
    /// warning log; the returned snapshot always reflects the game, so the
    /// player's results never depend on the write succeeding.
    pub async fn record(&self, game: &GameRecord) -> RecordOutcome {
        let mut snapshot = match self.stats.load().await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read stored statistics, starting from zero");
                StatsSnapshot::default()
            }
        };

        snapshot.record_game(game);

        let persisted = match self.stats.save(&snapshot).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to persist statistics");
                false
            }
        };

        RecordOutcome {
            snapshot,
            persisted,
        }
    }

    /// Conclusion text shown to the player when a game ends.
    #[must_use]
    pub fn summary_text(game: &GameRecord, snapshot: &StatsSnapshot) -> String {
        let best = snapshot.best_game();
        format!(
            "Your result: {}/{}\nQuizzes played: {}\nRecord: {}/{} ({})\nAverage accuracy: {:.2}%",
            game.correct(),
            game.total(),
            snapshot.games_count(),
            best.correct(),
            best.total(),
            best.played_at().format("%d.%m.%y %H:%M"),
            snapshot.total_accuracy()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::time::fixed_now;
    use storage::repository::{InMemoryStatsRepository, StorageError};

    struct FailingRepository;

    #[async_trait]
    impl StatsRepository for FailingRepository {
        async fn load(&self) -> Result<StatsSnapshot, StorageError> {
            Err(StorageError::Connection("disk offline".into()))
        }

        async fn save(&self, _snapshot: &StatsSnapshot) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk offline".into()))
        }
    }

    #[tokio::test]
    async fn accuracy_is_zero_before_any_game() {
        let service = StatisticsService::new(Arc::new(InMemoryStatsRepository::new()));
        let snapshot = service.snapshot().await.unwrap();
        assert_eq!(snapshot.total_accuracy(), 0.0);
    }

    #[tokio::test]
    async fn record_accumulates_and_persists() {
        let repo = Arc::new(InMemoryStatsRepository::new());
        let service = StatisticsService::new(Arc::clone(&repo) as Arc<dyn StatsRepository>);

        let outcome = service.record(&GameRecord::new(7, 10, fixed_now())).await;
        assert!(outcome.persisted);
        assert!((outcome.snapshot.total_accuracy() - 70.0).abs() < f64::EPSILON);

        let stored = repo.load().await.unwrap();
        assert_eq!(stored, outcome.snapshot);
        assert_eq!(stored.games_count(), 1);
    }

    #[tokio::test]
    async fn record_survives_a_dead_backend() {
        let service = StatisticsService::new(Arc::new(FailingRepository));

        let outcome = service.record(&GameRecord::new(9, 10, fixed_now())).await;
        assert!(!outcome.persisted);
        assert_eq!(outcome.snapshot.games_count(), 1);
        assert_eq!(outcome.snapshot.best_game().correct(), 9);
    }

    #[tokio::test]
    async fn summary_text_lists_result_record_and_accuracy() {
        let repo = Arc::new(InMemoryStatsRepository::new());
        let service = StatisticsService::new(repo as Arc<dyn StatsRepository>);

        let game = GameRecord::new(7, 10, fixed_now());
        let outcome = service.record(&game).await;
        let text = StatisticsService::summary_text(&game, &outcome.snapshot);

        assert!(text.starts_with("Your result: 7/10\n"));
        assert!(text.contains("Quizzes played: 1\n"));
        assert!(text.contains("Record: 7/10 (17.04.24 12:00)\n"));
        assert!(text.ends_with("Average accuracy: 70.00%"));
    }
}
