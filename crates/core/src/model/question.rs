use std::fmt;

/// Thresholds a question may compare a rating against.
pub const RATING_THRESHOLDS: [u8; 3] = [7, 8, 9];

/// One randomly drawn yes/no comparison against a movie's rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingComparison {
    threshold: u8,
    greater: bool,
}

impl RatingComparison {
    #[must_use]
    pub fn new(threshold: u8, greater: bool) -> Self {
        Self { threshold, greater }
    }

    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    #[must_use]
    pub fn is_greater_than(&self) -> bool {
        self.greater
    }

    /// Player-facing prompt for this comparison.
    #[must_use]
    pub fn prompt_text(&self) -> String {
        let direction = if self.greater { "greater" } else { "less" };
        format!(
            "Is this movie's rating {direction} than {}?",
            self.threshold
        )
    }

    /// Whether the comparison holds for the given rating.
    ///
    /// Strict in both directions: a rating equal to the threshold answers
    /// "no" for either phrasing.
    #[must_use]
    pub fn holds_for(&self, rating: f64) -> bool {
        let threshold = f64::from(self.threshold);
        if self.greater {
            rating > threshold
        } else {
            rating < threshold
        }
    }
}

/// A fully formed quiz question: poster image, prompt, expected answer.
///
/// Immutable once built; the session owns it until the next round begins.
#[derive(Clone, PartialEq, Eq)]
pub struct Question {
    image: Vec<u8>,
    text: String,
    correct_answer: bool,
}

impl Question {
    #[must_use]
    pub fn new(image: Vec<u8>, text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            image,
            text: text.into(),
            correct_answer,
        }
    }

    #[must_use]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> bool {
        self.correct_answer
    }
}

impl fmt::Debug for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Question")
            .field("image_len", &self.image.len())
            .field("text", &self.text)
            .field("correct_answer", &self.correct_answer)
            .finish()
    }
}
