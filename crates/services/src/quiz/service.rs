use chrono::{DateTime, Utc};
use quiz_core::model::{GameRecord, Question};

use super::events::QuizStep;
use crate::error::QuizError;

/// Number of questions in one game.
pub const QUESTIONS_PER_GAME: u32 = 10;

/// Lifecycle phase of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Idle,
    Loading,
    AwaitingAnswer,
    Evaluating,
    Concluded,
    Failed,
}

/// Ties an in-flight question request to the round that issued it.
///
/// Deliveries carrying a stale ticket are ignored, so a question fetched
/// for an abandoned round can never leak into a later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
}

/// Result of answering the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
}

/// What `advance` decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next round; a question must be delivered for the ticket.
    Next(LoadTicket),
    /// The last round was answered; the game record is final.
    Concluded(GameRecord),
    /// Not in the evaluating phase; nothing changed.
    Ignored,
}

/// State machine for a single player's quiz run.
///
/// Purely synchronous; the async workflow drives it and hands deliveries
/// back in. Callers are serialized by construction — the machine is not
/// meant to be shared across concurrent contexts.
#[derive(Debug)]
pub struct QuizSession {
    question_count: u32,
    phase: QuizPhase,
    current_index: u32,
    correct_count: u32,
    current_question: Option<Question>,
    epoch: u64,
    presented_this_game: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    #[must_use]
    pub fn new() -> Self {
        Self::with_question_count(QUESTIONS_PER_GAME)
    }

    /// Session over a custom number of rounds.
    #[must_use]
    pub fn with_question_count(question_count: u32) -> Self {
        Self {
            question_count,
            phase: QuizPhase::Idle,
            current_index: 0,
            correct_count: 0,
            current_question: None,
            epoch: 0,
            presented_this_game: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    /// Zero-based index of the round in play.
    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.current_index
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    /// Begin a fresh game: reset score and position, request round one.
    pub fn start(&mut self) -> LoadTicket {
        self.current_index = 0;
        self.correct_count = 0;
        self.current_question = None;
        self.presented_this_game = false;
        self.begin_loading()
    }

    fn begin_loading(&mut self) -> LoadTicket {
        self.phase = QuizPhase::Loading;
        self.epoch += 1;
        LoadTicket { epoch: self.epoch }
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        self.phase == QuizPhase::Loading && ticket.epoch == self.epoch
    }

    /// Deliver a loaded question.
    ///
    /// Returns the presentation step on acceptance; `None` when the session
    /// is not expecting this delivery (stale ticket or wrong phase).
    pub fn question_ready(&mut self, ticket: LoadTicket, question: Question) -> Option<QuizStep> {
        if !self.accepts(ticket) {
            return None;
        }

        let step = QuizStep {
            prompt: question.text().to_owned(),
            image: question.image().to_vec(),
            counter: format!("{}/{}", self.current_index + 1, self.question_count),
        };
        self.current_question = Some(question);
        self.phase = QuizPhase::AwaitingAnswer;
        self.presented_this_game = true;
        Some(step)
    }

    /// Report that loading the round's question failed.
    ///
    /// Returns whether the failure was accepted; stale failures are ignored
    /// just like stale questions.
    pub fn question_failed(&mut self, ticket: LoadTicket) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        self.phase = QuizPhase::Failed;
        true
    }

    /// Score the player's answer against the current question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AnswerNotExpected` outside the awaiting phase.
    pub fn answer(&mut self, given: bool) -> Result<AnswerOutcome, QuizError> {
        if self.phase != QuizPhase::AwaitingAnswer {
            return Err(QuizError::AnswerNotExpected { phase: self.phase });
        }
        let Some(question) = self.current_question.as_ref() else {
            return Err(QuizError::AnswerNotExpected { phase: self.phase });
        };

        let is_correct = question.correct_answer() == given;
        if is_correct {
            self.correct_count += 1;
        }
        self.phase = QuizPhase::Evaluating;
        Ok(AnswerOutcome { is_correct })
    }

    /// Move past the answered question: next round or conclusion.
    ///
    /// A no-op outside the evaluating phase, so a repeat call after the
    /// game concluded cannot move the session.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Advance {
        if self.phase != QuizPhase::Evaluating {
            return Advance::Ignored;
        }

        if self.current_index + 1 >= self.question_count {
            self.phase = QuizPhase::Concluded;
            self.current_question = None;
            return Advance::Concluded(GameRecord::new(
                self.correct_count,
                self.question_count,
                now,
            ));
        }

        self.current_index += 1;
        self.current_question = None;
        Advance::Next(self.begin_loading())
    }

    /// Re-issue the failed load.
    ///
    /// Keeps the score and position when at least one question was already
    /// shown this game; otherwise the game never really began and retry
    /// falls back to a clean start.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::RetryUnavailable` outside the failed phase.
    pub fn retry(&mut self) -> Result<LoadTicket, QuizError> {
        if self.phase != QuizPhase::Failed {
            return Err(QuizError::RetryUnavailable);
        }
        if self.presented_this_game {
            Ok(self.begin_loading())
        } else {
            Ok(self.start())
        }
    }

    /// Start over after a concluded or failed game.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::RestartUnavailable` while a game is in progress.
    pub fn restart(&mut self) -> Result<LoadTicket, QuizError> {
        match self.phase {
            QuizPhase::Concluded | QuizPhase::Failed => Ok(self.start()),
            _ => Err(QuizError::RestartUnavailable),
        }
    }
}
