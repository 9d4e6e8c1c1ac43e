use std::sync::Arc;

use quiz_core::Clock;
use storage::repository::Storage;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::catalog::{HttpImageFetcher, ImageFetcher, ImdbCatalog, MovieCatalog};
use crate::error::AppServicesError;
use crate::question_factory::QuestionFactory;
use crate::quiz::{QuizEvent, QuizLoopService};
use crate::statistics_service::StatisticsService;

/// Assembles the quiz services over a chosen storage backend.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    factory: Arc<QuestionFactory>,
    statistics: Arc<StatisticsService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::with_storage(
            storage,
            clock,
            Arc::new(ImdbCatalog::from_env()),
            Arc::new(HttpImageFetcher::new()),
        ))
    }

    /// Build services over injected collaborators (tests, other backends).
    #[must_use]
    pub fn with_storage(
        storage: Storage,
        clock: Clock,
        catalog: Arc<dyn MovieCatalog>,
        images: Arc<dyn ImageFetcher>,
    ) -> Self {
        Self {
            clock,
            factory: Arc::new(QuestionFactory::new(catalog, images)),
            statistics: Arc::new(StatisticsService::new(Arc::clone(&storage.stats))),
        }
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn question_factory(&self) -> Arc<QuestionFactory> {
        Arc::clone(&self.factory)
    }

    /// Hand out a wired quiz loop plus the event stream for presentation.
    #[must_use]
    pub fn quiz_loop(&self) -> (QuizLoopService, UnboundedReceiver<QuizEvent>) {
        QuizLoopService::new(
            self.clock,
            Arc::clone(&self.factory),
            Arc::clone(&self.statistics),
        )
    }
}
