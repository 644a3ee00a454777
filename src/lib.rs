//! Pre-match rating and rolling-form features for league football.
//!
//! [`engine::MatchEngine`] folds a date-ordered match list through an Elo
//! style [`elo::RatingTracker`] and a [`form::FormTracker`], emitting for each
//! match the values as they stood before kickoff.

pub mod config;
pub mod elo;
pub mod engine;
pub mod error;
pub mod features;
pub mod form;
pub mod history_store;
pub mod matches;
pub mod scorer;

pub use config::{EngineConfig, FormPolicy, RatingConfig};
pub use elo::RatingTracker;
pub use engine::{FixtureView, HistoryRow, MatchEngine, PreMatch, Prediction};
pub use error::{EngineError, Result};
pub use features::{FEATURE_COLUMNS, FeatureRow, FeatureRowBuilder};
pub use form::{FormSnapshot, FormTracker, SideForm};
pub use matches::{Fixture, MarketOdds, MatchRecord, Outcome};
pub use scorer::{ScoreOutput, Scorer};
