//! The chronological pass that ties ratings, form and feature rows together.
//!
//! For every match all reads (ratings, form) happen before any write, so the
//! row emitted for a match never contains its own result.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::elo::{self, RatingTracker};
use crate::error::{EngineError, Result};
use crate::features::{FeatureRow, FeatureRowBuilder};
use crate::form::{FormSnapshot, FormTracker};
use crate::matches::{Fixture, MarketOdds, MatchRecord, Outcome};
use crate::scorer::{ScoreOutput, Scorer};

/// Ratings and form as they stood before kickoff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreMatch {
    pub elo_home: f64,
    pub elo_away: f64,
    pub form: FormSnapshot,
}

/// One processed match: the input fields, its result and its pre-match state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub league: String,
    pub date: NaiveDate,
    pub home: String,
    pub away: String,
    pub goals_home: u8,
    pub goals_away: u8,
    pub odds: MarketOdds,
    pub outcome: Outcome,
    pub pre: PreMatch,
    pub features: FeatureRow,
}

impl HistoryRow {
    pub fn to_match_record(&self) -> MatchRecord {
        MatchRecord {
            league: self.league.clone(),
            date: self.date,
            home: self.home.clone(),
            away: self.away.clone(),
            goals_home: Some(self.goals_home),
            goals_away: Some(self.goals_away),
            odds: self.odds,
        }
    }
}

/// Pre-match view of an upcoming fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureView {
    pub fixture: Fixture,
    pub pre: PreMatch,
    /// Odds actually placed in the row; synthesized when the market had none.
    pub odds: MarketOdds,
    pub features: FeatureRow,
    /// Neither side has played a tracked match.
    pub unrated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub view: FixtureView,
    pub score: ScoreOutput,
}

#[derive(Debug, Clone)]
pub struct MatchEngine {
    cfg: EngineConfig,
    ratings: RatingTracker,
    form: FormTracker,
    builder: FeatureRowBuilder,
    last_date: Option<NaiveDate>,
    processed: usize,
}

impl MatchEngine {
    pub fn new(cfg: EngineConfig) -> Result<Self> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            ratings: RatingTracker::new(cfg.rating),
            form: FormTracker::new(cfg.form),
            builder: FeatureRowBuilder::default(),
            last_date: None,
            processed: 0,
        })
    }

    /// Use the column list a scorer declares for every row this engine emits.
    pub fn with_feature_columns(mut self, columns: Vec<String>) -> Self {
        self.builder = FeatureRowBuilder::new(columns);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    pub fn ratings(&self) -> &RatingTracker {
        &self.ratings
    }

    pub fn form(&self) -> &FormTracker {
        &self.form
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    /// Fold a chronologically sorted batch into the trackers and return one
    /// row per match. The batch is validated up front; on error no state is
    /// touched.
    pub fn process(&mut self, matches: &[MatchRecord]) -> Result<Vec<HistoryRow>> {
        self.validate_batch(matches)?;
        self.builder.check_columns()?;

        let mut out = Vec::with_capacity(matches.len());
        for m in matches {
            out.push(self.step(self.processed, m)?);
        }

        info!(
            matches = matches.len(),
            total = self.processed,
            teams = self.ratings.len(),
            "processed match batch"
        );
        Ok(out)
    }

    /// Rebuild state from stored history without keeping the rows.
    pub fn replay(&mut self, matches: &[MatchRecord]) -> Result<usize> {
        Ok(self.process(matches)?.len())
    }

    pub fn snapshot_fixture(&self, home: &str, away: &str) -> PreMatch {
        PreMatch {
            elo_home: self.ratings.rating_or_base(home),
            elo_away: self.ratings.rating_or_base(away),
            form: self.form.pre_match_form(home, away),
        }
    }

    pub fn view_fixture(&self, fixture: &Fixture, synthesize_odds: bool) -> Result<FixtureView> {
        self.view_with(&self.builder, fixture, synthesize_odds)
    }

    pub fn predict(
        &self,
        fixtures: &[Fixture],
        scorer: &dyn Scorer,
        synthesize_odds: bool,
    ) -> Result<Vec<Prediction>> {
        let builder = FeatureRowBuilder::new(scorer.feature_names());
        builder.check_columns()?;

        let mut out = Vec::with_capacity(fixtures.len());
        for fixture in fixtures {
            let view = self.view_with(&builder, fixture, synthesize_odds)?;
            if view.unrated {
                warn!(
                    home = %fixture.home,
                    away = %fixture.away,
                    "both teams have no rating history"
                );
            }
            let score = scorer.score(&view.features)?;
            debug!(
                home = %fixture.home,
                away = %fixture.away,
                label = %score.label,
                confidence = score.confidence,
                "scored fixture"
            );
            out.push(Prediction { view, score });
        }
        Ok(out)
    }

    fn view_with(
        &self,
        builder: &FeatureRowBuilder,
        fixture: &Fixture,
        synthesize_odds: bool,
    ) -> Result<FixtureView> {
        let pre = self.snapshot_fixture(&fixture.home, &fixture.away);
        let odds = if !fixture.odds.is_known() && synthesize_odds {
            elo::synthetic_odds(
                pre.elo_home,
                pre.elo_away,
                self.cfg.rating.scale,
                self.cfg.synthetic_draw_odds,
            )
        } else {
            fixture.odds
        };
        let features = builder.build((pre.elo_home, pre.elo_away), &pre.form, odds)?;
        let unrated = self.ratings.rating(&fixture.home).is_none()
            && self.ratings.rating(&fixture.away).is_none();
        Ok(FixtureView {
            fixture: fixture.clone(),
            pre,
            odds,
            features,
            unrated,
        })
    }

    fn validate_batch(&self, matches: &[MatchRecord]) -> Result<()> {
        let mut previous = self.last_date;
        for (offset, m) in matches.iter().enumerate() {
            let index = self.processed + offset;
            if m.final_score().is_none() {
                return Err(EngineError::MissingGoals {
                    index,
                    home: m.home.clone(),
                    away: m.away.clone(),
                    date: m.date,
                });
            }
            if m.home == m.away {
                return Err(EngineError::SelfMatch {
                    index,
                    team: m.home.clone(),
                    date: m.date,
                });
            }
            if let Some(prev) = previous
                && m.date < prev
            {
                return Err(EngineError::OutOfOrder {
                    index,
                    home: m.home.clone(),
                    away: m.away.clone(),
                    date: m.date,
                    previous: prev,
                });
            }
            previous = Some(m.date);
        }
        Ok(())
    }

    // Scores were already checked by `validate_batch`.
    fn step(&mut self, index: usize, m: &MatchRecord) -> Result<HistoryRow> {
        let Some((goals_home, goals_away)) = m.final_score() else {
            return Err(EngineError::MissingGoals {
                index,
                home: m.home.clone(),
                away: m.away.clone(),
                date: m.date,
            });
        };

        let (elo_home, elo_away) = self.ratings.pre_match_ratings(&m.home, &m.away);
        let form = self.form.pre_match_form(&m.home, &m.away);
        let features = self.builder.build((elo_home, elo_away), &form, m.odds)?;

        self.ratings
            .apply_result(&m.home, &m.away, goals_home, goals_away);
        self.form.apply_result(&m.home, &m.away, goals_home, goals_away);
        self.last_date = Some(m.date);
        self.processed += 1;

        Ok(HistoryRow {
            league: m.league.clone(),
            date: m.date,
            home: m.home.clone(),
            away: m.away.clone(),
            goals_home,
            goals_away,
            odds: m.odds,
            outcome: Outcome::from_goals(goals_home, goals_away),
            pre: PreMatch {
                elo_home,
                elo_away,
                form,
            },
            features,
        })
    }
}
