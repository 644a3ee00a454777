use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the rating/form pass and its storage.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("match #{index} {home} vs {away} on {date} has no final score")]
    MissingGoals {
        index: usize,
        home: String,
        away: String,
        date: NaiveDate,
    },

    #[error("match #{index} {home} vs {away} dated {date} comes after {previous}")]
    OutOfOrder {
        index: usize,
        home: String,
        away: String,
        date: NaiveDate,
        previous: NaiveDate,
    },

    #[error("match #{index} on {date} lists {team} on both sides")]
    SelfMatch {
        index: usize,
        team: String,
        date: NaiveDate,
    },

    #[error("feature columns {actual:?} do not match scorer columns {expected:?}")]
    FeatureColumnMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("scorer failed: {0}")]
    Scorer(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
