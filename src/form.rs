//! Rolling form over each team's most recent matches.
//!
//! Every team keeps three parallel series (league points, goals scored, goals
//! conceded), always from its own point of view. Only the trailing window is
//! ever read, so storage is capped at the window size.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::config::FormPolicy;

#[derive(Debug, Clone, Default)]
struct TeamForm {
    points: VecDeque<u8>,
    scored: VecDeque<u8>,
    conceded: VecDeque<u8>,
    played: usize,
}

impl TeamForm {
    fn push(&mut self, window: usize, points: u8, scored: u8, conceded: u8) {
        for (series, value) in [
            (&mut self.points, points),
            (&mut self.scored, scored),
            (&mut self.conceded, conceded),
        ] {
            series.push_back(value);
            while series.len() > window {
                series.pop_front();
            }
        }
        self.played += 1;
    }
}

/// Window aggregates for one side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideForm {
    /// Sum of league points over the window.
    pub points: u32,
    /// Mean goals scored over the window.
    pub attack: f64,
    /// Mean goals conceded over the window.
    pub defense: f64,
    /// Real matches behind the figures; zero means the debutant default.
    pub window_matches: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub home: SideForm,
    pub away: SideForm,
}

impl FormSnapshot {
    pub fn form_home(&self) -> u32 {
        self.home.points
    }

    pub fn form_away(&self) -> u32 {
        self.away.points
    }

    pub fn attack_home(&self) -> f64 {
        self.home.attack
    }

    pub fn attack_away(&self) -> f64 {
        self.away.attack
    }

    pub fn defense_home(&self) -> f64 {
        self.home.defense
    }

    pub fn defense_away(&self) -> f64 {
        self.away.defense
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormTracker {
    teams: HashMap<String, TeamForm>,
    policy: FormPolicy,
}

impl FormTracker {
    pub fn new(policy: FormPolicy) -> Self {
        Self {
            teams: HashMap::new(),
            policy,
        }
    }

    pub fn policy(&self) -> &FormPolicy {
        &self.policy
    }

    pub fn pre_match_form(&self, home: &str, away: &str) -> FormSnapshot {
        FormSnapshot {
            home: self.side_form(home),
            away: self.side_form(away),
        }
    }

    pub fn side_form(&self, team: &str) -> SideForm {
        let Some(form) = self.teams.get(team).filter(|f| !f.points.is_empty()) else {
            return self.debut_form();
        };

        let n = form.points.len();
        let points = form.points.iter().map(|p| u32::from(*p)).sum();
        let scored: u32 = form.scored.iter().map(|g| u32::from(*g)).sum();
        let conceded: u32 = form.conceded.iter().map(|g| u32::from(*g)).sum();
        SideForm {
            points,
            attack: f64::from(scored) / n as f64,
            defense: f64::from(conceded) / n as f64,
            window_matches: n,
        }
    }

    pub fn apply_result(&mut self, home: &str, away: &str, goals_home: u8, goals_away: u8) {
        let (points_home, points_away) = league_points(goals_home, goals_away);
        let window = self.policy.window;
        self.teams
            .entry(home.to_string())
            .or_default()
            .push(window, points_home, goals_home, goals_away);
        self.teams
            .entry(away.to_string())
            .or_default()
            .push(window, points_away, goals_away, goals_home);
    }

    /// Total matches recorded for a team, including those outside the window.
    pub fn matches_played(&self, team: &str) -> usize {
        self.teams.get(team).map(|f| f.played).unwrap_or(0)
    }

    fn debut_form(&self) -> SideForm {
        let p = &self.policy;
        SideForm {
            points: p.debut_points_per_match * p.window as u32,
            attack: p.debut_attack,
            defense: p.debut_defense,
            window_matches: 0,
        }
    }
}

/// League points for (home, away): 3 for a win, 1 each for a draw.
pub fn league_points(goals_home: u8, goals_away: u8) -> (u8, u8) {
    if goals_home > goals_away {
        (3, 0)
    } else if goals_home < goals_away {
        (0, 3)
    } else {
        (1, 1)
    }
}
