use std::sync::Arc;

use quiz_core::model::{MovieRecord, Question, RATING_THRESHOLDS, RatingComparison};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::{Mutex, RwLock};

use crate::catalog::{ImageFetcher, MovieCatalog};
use crate::error::QuestionError;

/// Builds one randomized rating question at a time from the movie pool.
///
/// The pool is installed once from the catalog; each generation snapshots
/// its pick under the read lock, so a concurrent reload cannot interleave
/// with an in-flight question.
pub struct QuestionFactory {
    catalog: Arc<dyn MovieCatalog>,
    images: Arc<dyn ImageFetcher>,
    pool: RwLock<Option<Vec<MovieRecord>>>,
    rng: Mutex<StdRng>,
}

impl QuestionFactory {
    #[must_use]
    pub fn new(catalog: Arc<dyn MovieCatalog>, images: Arc<dyn ImageFetcher>) -> Self {
        Self {
            catalog,
            images,
            pool: RwLock::new(None),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Replace the random source with a seeded one for reproducible tests.
    #[must_use]
    pub fn with_rng_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Whether the movie pool has been installed (it may still be empty).
    pub async fn is_loaded(&self) -> bool {
        self.pool.read().await.is_some()
    }

    /// Fetch the catalog and install the movie pool.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::CatalogLoad` when the catalog cannot be read.
    pub async fn load_pool(&self) -> Result<usize, QuestionError> {
        let movies = self.catalog.load_movies().await?;
        let count = movies.len();
        *self.pool.write().await = Some(movies);
        Ok(count)
    }

    /// Generate the next question.
    ///
    /// # Errors
    ///
    /// `PoolNotReady` before `load_pool` succeeded, `EmptyPool` for a loaded
    /// but empty catalog, `ImageFetch` when the poster download fails.
    pub async fn next_question(&self) -> Result<Question, QuestionError> {
        let (movie, comparison) = self.draw().await?;

        let image = self.images.fetch(&movie.resized_image_url()).await?;
        let correct_answer = comparison.holds_for(movie.parsed_rating());

        Ok(Question::new(image, comparison.prompt_text(), correct_answer))
    }

    /// Pick a movie and a comparison under the pool snapshot.
    async fn draw(&self) -> Result<(MovieRecord, RatingComparison), QuestionError> {
        let guard = self.pool.read().await;
        let pool = guard.as_ref().ok_or(QuestionError::PoolNotReady)?;

        let mut rng = self.rng.lock().await;
        let movie = pool
            .choose(&mut *rng)
            .cloned()
            .ok_or(QuestionError::EmptyPool)?;
        let threshold = RATING_THRESHOLDS
            .choose(&mut *rng)
            .copied()
            .unwrap_or(RATING_THRESHOLDS[0]);
        let greater = rng.random_bool(0.5);

        Ok((movie, RatingComparison::new(threshold, greater)))
    }
}
