//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

use crate::quiz::QuizPhase;

/// Errors from the movie catalog collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("movie catalog request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("movie catalog reported an error: {0}")]
    Service(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors from the poster image collaborator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImageFetchError {
    #[error("poster request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `QuestionFactory`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("movie pool is empty")]
    EmptyPool,
    #[error("movie pool has not finished loading")]
    PoolNotReady,
    #[error("failed to fetch poster image: {0}")]
    ImageFetch(#[from] ImageFetchError),
    #[error("failed to load movie catalog: {0}")]
    CatalogLoad(#[from] CatalogError),
}

impl QuestionError {
    /// HTTP status carried by the underlying failure, when there is one.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ImageFetch(ImageFetchError::HttpStatus(status))
            | Self::CatalogLoad(CatalogError::HttpStatus(status)) => Some(status.as_u16()),
            _ => None,
        }
    }
}

/// Errors emitted by the quiz session for calls outside their phase.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no answer is expected in the {phase:?} phase")]
    AnswerNotExpected { phase: QuizPhase },
    #[error("retry is only available after a load failure")]
    RetryUnavailable,
    #[error("restart is only available once the game has concluded or failed")]
    RestartUnavailable,
}

/// Errors emitted by `StatisticsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatisticsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
