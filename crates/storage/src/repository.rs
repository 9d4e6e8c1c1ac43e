use async_trait::async_trait;
use quiz_core::model::StatsSnapshot;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for the persisted statistics record.
///
/// There is exactly one record per installation. `load` returns zero-value
/// defaults until the first `save`; a successful `save` is durably visible
/// to every later call and survives process restarts.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Fetch the persisted statistics snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or holds
    /// corrupt values.
    async fn load(&self) -> Result<StatsSnapshot, StorageError>;

    /// Persist the statistics snapshot before returning.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    async fn save(&self, snapshot: &StatsSnapshot) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStatsRepository {
    stats: Arc<Mutex<Option<StatsSnapshot>>>,
}

impl InMemoryStatsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn load(&self) -> Result<StatsSnapshot, StorageError> {
        let guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone().unwrap_or_default())
    }

    async fn save(&self, snapshot: &StatsSnapshot) -> Result<(), StorageError> {
        let mut guard = self
            .stats
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(snapshot.clone());
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub stats: Arc<dyn StatsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            stats: Arc::new(InMemoryStatsRepository::new()),
        }
    }
}
