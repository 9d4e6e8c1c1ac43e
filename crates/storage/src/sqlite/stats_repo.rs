use chrono::{DateTime, Utc};
use quiz_core::model::{GameRecord, StatsSnapshot};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{StatsRepository, StorageError};

const KEY_CORRECT: &str = "correct";
const KEY_TOTAL: &str = "total";
const KEY_GAMES_COUNT: &str = "games_count";
const KEY_BEST_GAME: &str = "best_game";

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn parse_u32(field: &'static str, value: &str) -> Result<u32, StorageError> {
    value
        .parse()
        .map_err(|_| StorageError::Serialization(format!("invalid {field}: {value}")))
}

/// Persisted shape of the best game.
///
/// Mirrors the domain `GameRecord` so the JSON layout stays a storage
/// concern; the date round-trips as an RFC 3339 string.
#[derive(Debug, Serialize, Deserialize)]
struct BestGameValue {
    correct: u32,
    total: u32,
    date: DateTime<Utc>,
}

impl BestGameValue {
    fn from_record(record: &GameRecord) -> Self {
        Self {
            correct: record.correct(),
            total: record.total(),
            date: record.played_at(),
        }
    }

    fn into_record(self) -> Result<GameRecord, StorageError> {
        GameRecord::from_persisted(self.correct, self.total, self.date).map_err(ser)
    }
}

impl SqliteRepository {
    async fn read_value(&self, key: &'static str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM quiz_stats WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;
        row.map(|r| r.try_get::<String, _>("value").map_err(ser))
            .transpose()
    }

    async fn read_u32(&self, key: &'static str) -> Result<u32, StorageError> {
        match self.read_value(key).await? {
            Some(value) => parse_u32(key, &value),
            None => Ok(0),
        }
    }
}

#[async_trait::async_trait]
impl StatsRepository for SqliteRepository {
    async fn load(&self) -> Result<StatsSnapshot, StorageError> {
        let correct = self.read_u32(KEY_CORRECT).await?;
        let total = self.read_u32(KEY_TOTAL).await?;
        let games_count = self.read_u32(KEY_GAMES_COUNT).await?;

        let best_game = match self.read_value(KEY_BEST_GAME).await? {
            Some(value) => serde_json::from_str::<BestGameValue>(&value)
                .map_err(ser)?
                .into_record()?,
            None => GameRecord::zero(),
        };

        StatsSnapshot::from_persisted(correct, total, games_count, best_game).map_err(ser)
    }

    async fn save(&self, snapshot: &StatsSnapshot) -> Result<(), StorageError> {
        let best_game = serde_json::to_string(&BestGameValue::from_record(snapshot.best_game()))
            .map_err(ser)?;

        let mut tx = self.pool.begin().await.map_err(conn)?;
        for (key, value) in [
            (KEY_CORRECT, snapshot.correct().to_string()),
            (KEY_TOTAL, snapshot.total().to_string()),
            (KEY_GAMES_COUNT, snapshot.games_count().to_string()),
            (KEY_BEST_GAME, best_game),
        ] {
            sqlx::query(
                r"
                    INSERT INTO quiz_stats (key, value)
                    VALUES (?1, ?2)
                    ON CONFLICT(key) DO UPDATE SET value = excluded.value
                ",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)
    }
}
