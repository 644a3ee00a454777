use std::collections::HashMap;

use tracing::debug;

use crate::config::RatingConfig;
use crate::matches::MarketOdds;

/// Rating changes produced by one match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingUpdate {
    pub expected_home: f64,
    pub home_delta: f64,
    pub away_delta: f64,
}

#[derive(Debug, Clone)]
pub struct RatingTracker {
    ratings: HashMap<String, f64>,
    cfg: RatingConfig,
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new(RatingConfig::default())
    }
}

impl RatingTracker {
    pub fn new(cfg: RatingConfig) -> Self {
        Self {
            ratings: HashMap::new(),
            cfg,
        }
    }

    pub fn config(&self) -> &RatingConfig {
        &self.cfg
    }

    /// Ratings as they stand before the match. Teams seen for the first time
    /// are registered at the base rating.
    pub fn pre_match_ratings(&mut self, home: &str, away: &str) -> (f64, f64) {
        (self.lookup_or_init(home), self.lookup_or_init(away))
    }

    pub fn rating(&self, team: &str) -> Option<f64> {
        self.ratings.get(team).copied()
    }

    /// Like [`rating`](Self::rating) but reports the base rating for unseen
    /// teams without registering them.
    pub fn rating_or_base(&self, team: &str) -> f64 {
        self.rating(team).unwrap_or(self.cfg.base_rating)
    }

    /// Seed a rating, e.g. from a stored snapshot.
    pub fn set_rating(&mut self, team: &str, rating: f64) {
        self.ratings.insert(team.to_string(), rating);
    }

    pub fn expected_home(&self, rating_home: f64, rating_away: f64) -> f64 {
        expected_score(rating_home, rating_away, self.cfg.scale)
    }

    pub fn apply_result(
        &mut self,
        home: &str,
        away: &str,
        goals_home: u8,
        goals_away: u8,
    ) -> RatingUpdate {
        let (r_home, r_away) = self.pre_match_ratings(home, away);

        let expected_home = self.expected_home(r_home, r_away);
        let expected_away = 1.0 - expected_home;
        let (s_home, s_away) = match_score(goals_home, goals_away);

        let home_delta = self.cfg.k_factor * (s_home - expected_home);
        let away_delta = self.cfg.k_factor * (s_away - expected_away);
        self.ratings.insert(home.to_string(), r_home + home_delta);
        self.ratings.insert(away.to_string(), r_away + away_delta);

        RatingUpdate {
            expected_home,
            home_delta,
            away_delta,
        }
    }

    /// All rated teams, strongest first. Equal ratings are ordered by name.
    pub fn standings(&self) -> Vec<(String, f64)> {
        let mut out: Vec<(String, f64)> = self
            .ratings
            .iter()
            .map(|(team, r)| (team.clone(), *r))
            .collect();
        out.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    fn lookup_or_init(&mut self, team: &str) -> f64 {
        if let Some(r) = self.ratings.get(team) {
            return *r;
        }
        debug!(team, rating = self.cfg.base_rating, "first rating lookup");
        self.ratings.insert(team.to_string(), self.cfg.base_rating);
        self.cfg.base_rating
    }
}

/// Logistic win expectancy of `r_a` against `r_b`.
pub fn expected_score(r_a: f64, r_b: f64, scale: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((r_b - r_a) / scale))
}

// Win 1, draw 0.5, loss 0 (not league points).
fn match_score(goals_home: u8, goals_away: u8) -> (f64, f64) {
    if goals_home > goals_away {
        (1.0, 0.0)
    } else if goals_home < goals_away {
        (0.0, 1.0)
    } else {
        (0.5, 0.5)
    }
}

/// Decimal odds implied by the rating gap, for fixtures with no market price.
pub fn synthetic_odds(
    rating_home: f64,
    rating_away: f64,
    scale: f64,
    draw_odds: f64,
) -> MarketOdds {
    let p_home = expected_score(rating_home, rating_away, scale);
    MarketOdds {
        home: round2(1.0 / p_home),
        draw: draw_odds,
        away: round2(1.0 / (1.0 - p_home)),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
