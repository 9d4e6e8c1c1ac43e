use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use quiz_core::Clock;
use quiz_core::model::MovieRecord;
use quiz_core::time::fixed_now;
use services::catalog::{ImageFetcher, MovieCatalog};
use services::error::{CatalogError, ImageFetchError, QuizError};
use services::quiz::{
    FeedbackPacer, GameSummary, QUESTIONS_PER_GAME, QuizEvent, QuizLoopService, QuizPhase,
};
use services::AppServices;
use storage::repository::Storage;
use tokio::sync::mpsc::UnboundedReceiver;
use url::Url;

struct ScriptedCatalog {
    movies: Vec<MovieRecord>,
    failures_left: AtomicU32,
}

impl ScriptedCatalog {
    fn new(movies: Vec<MovieRecord>) -> Self {
        Self {
            movies,
            failures_left: AtomicU32::new(0),
        }
    }

    fn failing_first(movies: Vec<MovieRecord>, failures: u32) -> Self {
        Self {
            movies,
            failures_left: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl MovieCatalog for ScriptedCatalog {
    async fn load_movies(&self) -> Result<Vec<MovieRecord>, CatalogError> {
        if self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(CatalogError::Service("catalog offline".into()));
        }
        Ok(self.movies.clone())
    }
}

struct StubFetcher;

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, ImageFetchError> {
        Ok(vec![0xFF, 0xD8, 0xFF])
    }
}

fn movie(title: &str, rating: &str) -> MovieRecord {
    MovieRecord::new(
        title,
        rating,
        Url::parse("https://img.example/p._V1_UX128_.jpg").unwrap(),
    )
}

fn catalog_movies() -> Vec<MovieRecord> {
    vec![
        movie("The Godfather", "9.2"),
        movie("Heat", "8.3"),
        movie("Alien", "8.5"),
        movie("Clue", "7.2"),
        movie("Jaws", "8.1"),
    ]
}

fn app_with_catalog(catalog: Arc<dyn MovieCatalog>) -> AppServices {
    AppServices::with_storage(
        Storage::in_memory(),
        Clock::fixed(fixed_now()),
        catalog,
        Arc::new(StubFetcher),
    )
}

fn app() -> AppServices {
    app_with_catalog(Arc::new(ScriptedCatalog::new(catalog_movies())))
}

/// Play a full game through the loop, answering every question correctly or
/// incorrectly, and return the conclusion summary.
async fn play_game(
    quiz: &mut QuizLoopService,
    events: &mut UnboundedReceiver<QuizEvent>,
    correctly: bool,
) -> GameSummary {
    for round in 0..QUESTIONS_PER_GAME {
        let event = events.recv().await.expect("question event");
        let QuizEvent::QuestionPresented(step) = event else {
            panic!("expected a question, got {event:?}");
        };
        assert_eq!(step.counter, format!("{}/{QUESTIONS_PER_GAME}", round + 1));
        assert!(!step.image.is_empty());

        let expected = quiz
            .session()
            .current_question()
            .expect("question in play")
            .correct_answer();
        let given = if correctly { expected } else { !expected };
        let outcome = quiz.answer(given).await.unwrap();
        assert_eq!(outcome.is_correct, correctly);

        let feedback = events.recv().await.expect("feedback event");
        assert_eq!(
            feedback,
            QuizEvent::AnswerResult {
                is_correct: correctly
            }
        );
    }

    let event = events.recv().await.expect("conclusion event");
    let QuizEvent::SessionConcluded(summary) = event else {
        panic!("expected the conclusion, got {event:?}");
    };
    summary
}

#[tokio::test]
async fn perfect_game_concludes_with_full_score_and_updates_statistics() {
    let app = app();
    let (quiz, mut events) = app.quiz_loop();
    let mut quiz = quiz.with_pacer(FeedbackPacer::immediate());

    quiz.start().await;
    let summary = play_game(&mut quiz, &mut events, true).await;

    assert_eq!(summary.record.correct(), QUESTIONS_PER_GAME);
    assert_eq!(summary.record.total(), QUESTIONS_PER_GAME);
    assert!(summary.persisted);
    assert_eq!(summary.snapshot.games_count(), 1);
    assert_eq!(summary.snapshot.best_game().correct(), QUESTIONS_PER_GAME);
    assert!(summary.text.starts_with("Your result: 10/10\n"));
    assert_eq!(quiz.session().phase(), QuizPhase::Concluded);

    let stats = app.statistics().snapshot().await.unwrap();
    assert_eq!(stats.games_count(), 1);
    assert!((stats.total_accuracy() - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn replay_with_worse_score_keeps_the_best_game() {
    let app = app();
    let (quiz, mut events) = app.quiz_loop();
    let mut quiz = quiz.with_pacer(FeedbackPacer::immediate());

    quiz.start().await;
    let first = play_game(&mut quiz, &mut events, true).await;
    assert_eq!(first.snapshot.best_game().correct(), QUESTIONS_PER_GAME);

    quiz.restart().await.unwrap();
    let second = play_game(&mut quiz, &mut events, false).await;

    assert_eq!(second.record.correct(), 0);
    assert_eq!(second.snapshot.games_count(), 2);
    assert_eq!(second.snapshot.best_game().correct(), QUESTIONS_PER_GAME);
    assert!((second.snapshot.total_accuracy() - 50.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn catalog_failure_surfaces_error_and_retry_recovers() {
    let app = app_with_catalog(Arc::new(ScriptedCatalog::failing_first(
        catalog_movies(),
        1,
    )));
    let (quiz, mut events) = app.quiz_loop();
    let mut quiz = quiz.with_pacer(FeedbackPacer::immediate());

    quiz.start().await;
    let event = events.recv().await.unwrap();
    let QuizEvent::Error { message, code } = event else {
        panic!("expected an error event, got {event:?}");
    };
    assert!(message.contains("catalog"));
    assert_eq!(code, None);
    assert_eq!(quiz.session().phase(), QuizPhase::Failed);

    // Answering while failed is rejected, the session waits for retry.
    let err = quiz.answer(true).await.unwrap_err();
    assert!(matches!(err, QuizError::AnswerNotExpected { .. }));

    quiz.retry().await.unwrap();
    let event = events.recv().await.unwrap();
    assert!(matches!(event, QuizEvent::QuestionPresented(_)));
    assert_eq!(quiz.session().phase(), QuizPhase::AwaitingAnswer);
}

#[tokio::test]
async fn restart_is_rejected_mid_game() {
    let app = app();
    let (quiz, mut events) = app.quiz_loop();
    let mut quiz = quiz.with_pacer(FeedbackPacer::immediate());

    quiz.start().await;
    let event = events.recv().await.unwrap();
    assert!(matches!(event, QuizEvent::QuestionPresented(_)));

    let err = quiz.restart().await.unwrap_err();
    assert_eq!(err, QuizError::RestartUnavailable);
    assert_eq!(quiz.session().phase(), QuizPhase::AwaitingAnswer);
}
