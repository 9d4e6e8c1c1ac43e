use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::GameRecord;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::events::{GameSummary, QuizEvent};
use super::pacer::FeedbackPacer;
use super::service::{Advance, AnswerOutcome, LoadTicket, QuizSession};
use crate::error::{QuestionError, QuizError};
use crate::question_factory::QuestionFactory;
use crate::statistics_service::StatisticsService;

/// Drives the quiz state machine against the async collaborators.
///
/// One instance per player session; methods take `&mut self`, so callers
/// are serialized by construction. The presentation layer consumes the
/// event receiver returned at construction and calls back in through
/// `start`/`answer`/`retry`/`restart`.
pub struct QuizLoopService {
    clock: Clock,
    pacer: FeedbackPacer,
    factory: Arc<QuestionFactory>,
    statistics: Arc<StatisticsService>,
    session: QuizSession,
    events: UnboundedSender<QuizEvent>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        factory: Arc<QuestionFactory>,
        statistics: Arc<StatisticsService>,
    ) -> (Self, UnboundedReceiver<QuizEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                clock,
                pacer: FeedbackPacer::default(),
                factory,
                statistics,
                session: QuizSession::new(),
                events,
            },
            receiver,
        )
    }

    /// Replace the feedback pacer (tests use `FeedbackPacer::immediate`).
    #[must_use]
    pub fn with_pacer(mut self, pacer: FeedbackPacer) -> Self {
        self.pacer = pacer;
        self
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    /// Begin a fresh game and present its first question.
    pub async fn start(&mut self) {
        let ticket = self.session.start();
        self.load_round(ticket).await;
    }

    /// Score an answer, pause for feedback, then move on.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AnswerNotExpected` when no question is awaiting
    /// an answer.
    pub async fn answer(&mut self, given: bool) -> Result<AnswerOutcome, QuizError> {
        let outcome = self.session.answer(given)?;
        self.emit(QuizEvent::AnswerResult {
            is_correct: outcome.is_correct,
        });

        self.pacer.pause().await;

        let advance = self.session.advance(self.clock.now());
        match advance {
            Advance::Next(ticket) => self.load_round(ticket).await,
            Advance::Concluded(record) => self.conclude(record).await,
            Advance::Ignored => {}
        }
        Ok(outcome)
    }

    /// Retry the failed load, keeping the score where possible.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::RetryUnavailable` unless a load failed.
    pub async fn retry(&mut self) -> Result<(), QuizError> {
        let ticket = self.session.retry()?;
        self.load_round(ticket).await;
        Ok(())
    }

    /// Start over after a concluded or failed game.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::RestartUnavailable` while a game is in progress.
    pub async fn restart(&mut self) -> Result<(), QuizError> {
        let ticket = self.session.restart()?;
        self.load_round(ticket).await;
        Ok(())
    }

    /// Fetch a question for the ticket and hand it to the machine.
    async fn load_round(&mut self, ticket: LoadTicket) {
        if !self.factory.is_loaded().await {
            let loaded = self.factory.load_pool().await;
            if let Err(err) = loaded {
                self.fail_round(ticket, &err);
                return;
            }
        }

        let fetched = self.factory.next_question().await;
        match fetched {
            Ok(question) => {
                if let Some(step) = self.session.question_ready(ticket, question) {
                    self.emit(QuizEvent::QuestionPresented(step));
                }
            }
            Err(err) => self.fail_round(ticket, &err),
        }
    }

    fn fail_round(&mut self, ticket: LoadTicket, err: &QuestionError) {
        if self.session.question_failed(ticket) {
            self.emit(QuizEvent::Error {
                message: err.to_string(),
                code: err.status_code(),
            });
        }
    }

    async fn conclude(&mut self, record: GameRecord) {
        let outcome = self.statistics.record(&record).await;
        let text = StatisticsService::summary_text(&record, &outcome.snapshot);
        self.emit(QuizEvent::SessionConcluded(GameSummary {
            record,
            snapshot: outcome.snapshot,
            persisted: outcome.persisted,
            text,
        }));
    }

    fn emit(&self, event: QuizEvent) {
        // A dropped receiver means the presentation went away; nothing to do.
        let _ = self.events.send(event);
    }
}
