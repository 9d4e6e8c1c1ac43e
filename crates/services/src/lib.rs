#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod question_factory;
pub mod quiz;
pub mod statistics_service;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use catalog::{CatalogConfig, HttpImageFetcher, ImageFetcher, ImdbCatalog, MovieCatalog};
pub use error::{
    AppServicesError, CatalogError, ImageFetchError, QuestionError, QuizError, StatisticsError,
};
pub use question_factory::QuestionFactory;
pub use quiz::{
    Advance, AnswerOutcome, FeedbackPacer, GameSummary, LoadTicket, QUESTIONS_PER_GAME, QuizEvent,
    QuizLoopService, QuizPhase, QuizSession, QuizStep,
};
pub use statistics_service::{RecordOutcome, StatisticsService};
