use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Decimal market prices. Zero on every side means the price is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketOdds {
    #[serde(default)]
    pub home: f64,
    #[serde(default)]
    pub draw: f64,
    #[serde(default)]
    pub away: f64,
}

impl MarketOdds {
    pub const UNKNOWN: MarketOdds = MarketOdds {
        home: 0.0,
        draw: 0.0,
        away: 0.0,
    };

    pub fn new(home: f64, draw: f64, away: f64) -> Self {
        Self { home, draw, away }
    }

    pub fn is_known(&self) -> bool {
        self.home > 0.0 && self.draw > 0.0 && self.away > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "H")]
    HomeWin,
    #[serde(rename = "D")]
    Draw,
    #[serde(rename = "A")]
    AwayWin,
}

impl Outcome {
    pub fn from_goals(goals_home: u8, goals_away: u8) -> Self {
        match goals_home.cmp(&goals_away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    pub fn code(self) -> char {
        match self {
            Outcome::HomeWin => 'H',
            Outcome::Draw => 'D',
            Outcome::AwayWin => 'A',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "H" => Some(Outcome::HomeWin),
            "D" => Some(Outcome::Draw),
            "A" => Some(Outcome::AwayWin),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One played (or raw, possibly incomplete) match row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(default)]
    pub league: String,
    pub date: NaiveDate,
    pub home: String,
    pub away: String,
    pub goals_home: Option<u8>,
    pub goals_away: Option<u8>,
    #[serde(default)]
    pub odds: MarketOdds,
}

impl MatchRecord {
    pub fn final_score(&self) -> Option<(u8, u8)> {
        Some((self.goals_home?, self.goals_away?))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        let (h, a) = self.final_score()?;
        Some(Outcome::from_goals(h, a))
    }
}

/// An upcoming match with no result yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub league: String,
    pub date: NaiveDate,
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub odds: MarketOdds,
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<Fixture>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

/// Stable sort by date; same-day matches keep their input order.
pub fn sort_chronologically(matches: &mut [MatchRecord]) {
    matches.sort_by(|a, b| a.date.cmp(&b.date));
}

pub fn filter_league(matches: Vec<MatchRecord>, league: &str) -> Vec<MatchRecord> {
    matches
        .into_iter()
        .filter(|m| m.league.eq_ignore_ascii_case(league))
        .collect()
}
