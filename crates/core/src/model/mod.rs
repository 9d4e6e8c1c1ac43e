mod game;
mod movie;
mod question;

pub use game::{GameRecord, GameRecordError, StatsSnapshot, StatsSnapshotError};
pub use movie::MovieRecord;
pub use question::{Question, RATING_THRESHOLDS, RatingComparison};
