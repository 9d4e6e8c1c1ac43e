use quiz_core::model::{GameRecord, StatsSnapshot};

/// Everything the presentation layer needs to render one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizStep {
    pub prompt: String,
    pub image: Vec<u8>,
    /// Position counter in "current/total" form, e.g. "3/10".
    pub counter: String,
}

/// Conclusion payload: the finished game plus the refreshed statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub record: GameRecord,
    pub snapshot: StatsSnapshot,
    /// False when the statistics write failed; the snapshot is then
    /// in-memory only and the next game starts from the stored state.
    pub persisted: bool,
    pub text: String,
}

/// Typed messages pushed to the presentation layer.
///
/// The presentation renders these; the quiz has no rendering responsibility
/// and never waits for the consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    QuestionPresented(QuizStep),
    AnswerResult { is_correct: bool },
    SessionConcluded(GameSummary),
    Error { message: String, code: Option<u16> },
}
