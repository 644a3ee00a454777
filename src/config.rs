use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    pub base_rating: f64,
    pub k_factor: f64,
    /// Rating gap that corresponds to 10:1 odds.
    pub scale: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            base_rating: 1500.0,
            k_factor: 25.0,
            scale: 400.0,
        }
    }
}

/// Rolling window size and the values reported for a team with no history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormPolicy {
    pub window: usize,
    pub debut_points_per_match: u32,
    pub debut_attack: f64,
    pub debut_defense: f64,
}

impl Default for FormPolicy {
    fn default() -> Self {
        Self {
            window: 5,
            debut_points_per_match: 1,
            debut_attack: 1.5,
            debut_defense: 1.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub rating: RatingConfig,
    #[serde(default)]
    pub form: FormPolicy,
    // Draw price used when odds are synthesized from ratings.
    #[serde(default = "default_synthetic_draw_odds")]
    pub synthetic_draw_odds: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rating: RatingConfig::default(),
            form: FormPolicy::default(),
            synthetic_draw_odds: default_synthetic_draw_odds(),
        }
    }
}

fn default_synthetic_draw_odds() -> f64 {
    3.60
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg = serde_json::from_str::<EngineConfig>(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let r = &self.rating;
        if !r.base_rating.is_finite() {
            return Err(EngineError::InvalidConfig(format!(
                "base_rating must be finite, got {}",
                r.base_rating
            )));
        }
        if !(r.k_factor.is_finite() && r.k_factor > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "k_factor must be positive, got {}",
                r.k_factor
            )));
        }
        if !(r.scale.is_finite() && r.scale > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "scale must be positive, got {}",
                r.scale
            )));
        }

        let f = &self.form;
        if f.window == 0 {
            return Err(EngineError::InvalidConfig(
                "form window must hold at least one match".to_string(),
            ));
        }
        if !(f.debut_attack.is_finite() && f.debut_attack >= 0.0)
            || !(f.debut_defense.is_finite() && f.debut_defense >= 0.0)
        {
            return Err(EngineError::InvalidConfig(format!(
                "debut averages must be non-negative, got attack={} defense={}",
                f.debut_attack, f.debut_defense
            )));
        }

        if !(self.synthetic_draw_odds.is_finite() && self.synthetic_draw_odds > 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "synthetic_draw_odds must be a decimal price above 1.0, got {}",
                self.synthetic_draw_odds
            )));
        }
        Ok(())
    }
}
