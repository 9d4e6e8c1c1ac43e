use std::time::Duration;

/// Pause between answer feedback and the next round.
///
/// `Wait` suspends the current task without blocking the thread;
/// `Immediate` is the seam for synchronous test walkthroughs.
#[derive(Debug, Clone, Copy)]
pub enum FeedbackPacer {
    Wait(Duration),
    Immediate,
}

impl Default for FeedbackPacer {
    fn default() -> Self {
        Self::Wait(Duration::from_secs(1))
    }
}

impl FeedbackPacer {
    #[must_use]
    pub fn immediate() -> Self {
        Self::Immediate
    }

    pub async fn pause(&self) {
        if let Self::Wait(delay) = self {
            tokio::time::sleep(*delay).await;
        }
    }
}
