mod events;
mod pacer;
mod service;
mod workflow;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use events::{GameSummary, QuizEvent, QuizStep};
pub use pacer::FeedbackPacer;
pub use service::{
    Advance, AnswerOutcome, LoadTicket, QUESTIONS_PER_GAME, QuizPhase, QuizSession,
};
pub use workflow::QuizLoopService;
