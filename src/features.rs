use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::form::FormSnapshot;
use crate::matches::MarketOdds;

pub const FEATURE_COUNT: usize = 11;

/// Column names the outcome models were fitted against, in slot order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "elo_home", "elo_away", "odds_home", "odds_draw", "odds_away", "h_form", "a_form", "h_att",
    "a_att", "h_def", "a_def",
];

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureRow {
    pub elo_home: f64,
    pub elo_away: f64,
    pub odds_home: f64,
    pub odds_draw: f64,
    pub odds_away: f64,
    pub h_form: f64,
    pub a_form: f64,
    pub h_att: f64,
    pub a_att: f64,
    pub h_def: f64,
    pub a_def: f64,
}

impl FeatureRow {
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.elo_home,
            self.elo_away,
            self.odds_home,
            self.odds_draw,
            self.odds_away,
            self.h_form,
            self.a_form,
            self.h_att,
            self.a_att,
            self.h_def,
            self.a_def,
        ]
    }

    pub fn named(&self) -> Vec<(&'static str, f64)> {
        FEATURE_COLUMNS.iter().copied().zip(self.to_array()).collect()
    }
}

/// Assembles feature rows for a scorer with a fixed, declared column list.
#[derive(Debug, Clone)]
pub struct FeatureRowBuilder {
    expected: Vec<String>,
}

impl Default for FeatureRowBuilder {
    fn default() -> Self {
        Self::new(FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect())
    }
}

impl FeatureRowBuilder {
    pub fn new(expected: Vec<String>) -> Self {
        Self { expected }
    }

    pub fn expected_columns(&self) -> &[String] {
        &self.expected
    }

    pub fn build(
        &self,
        ratings: (f64, f64),
        form: &FormSnapshot,
        odds: MarketOdds,
    ) -> Result<FeatureRow> {
        let row = FeatureRow {
            elo_home: ratings.0,
            elo_away: ratings.1,
            odds_home: odds.home,
            odds_draw: odds.draw,
            odds_away: odds.away,
            h_form: f64::from(form.form_home()),
            a_form: f64::from(form.form_away()),
            h_att: form.attack_home(),
            a_att: form.attack_away(),
            h_def: form.defense_home(),
            a_def: form.defense_away(),
        };
        self.check_columns()?;
        Ok(row)
    }

    pub fn check_columns(&self) -> Result<()> {
        let matches = self.expected.len() == FEATURE_COUNT
            && self
                .expected
                .iter()
                .zip(FEATURE_COLUMNS)
                .all(|(want, have)| want == have);
        if matches {
            return Ok(());
        }
        Err(EngineError::FeatureColumnMismatch {
            expected: self.expected.clone(),
            actual: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        })
    }
}
