use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::features::FeatureRow;
use crate::matches::Outcome;

/// Output of the trained outcome and goal models for one fixture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreOutput {
    pub label: Outcome,
    /// Probability the model assigns to `label`.
    pub confidence: f64,
    pub goals_home: f64,
    pub goals_away: f64,
}

/// A fitted model that consumes feature rows.
///
/// `feature_names` must return the columns the model was fitted with, in
/// order; rows are only handed over after that list has been checked
/// against the engine's own layout.
pub trait Scorer {
    fn feature_names(&self) -> Vec<String>;

    fn score(&self, row: &FeatureRow) -> Result<ScoreOutput>;
}
