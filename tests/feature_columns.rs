use chrono::NaiveDate;

use matchday_engine::{
    EngineConfig, EngineError, FEATURE_COLUMNS, FeatureRow, FeatureRowBuilder, Fixture,
    FormTracker, MarketOdds, MatchEngine, MatchRecord, Outcome, ScoreOutput, Scorer,
};

struct FixedScorer {
    columns: Vec<String>,
}

impl FixedScorer {
    fn fitted() -> Self {
        Self {
            columns: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Scorer for FixedScorer {
    fn feature_names(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn score(&self, row: &FeatureRow) -> matchday_engine::Result<ScoreOutput> {
        let label = if row.elo_home >= row.elo_away {
            Outcome::HomeWin
        } else {
            Outcome::AwayWin
        };
        Ok(ScoreOutput {
            label,
            confidence: 0.5,
            goals_home: row.h_att,
            goals_away: row.a_att,
        })
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
}

fn fixture(home: &str, away: &str, odds: MarketOdds) -> Fixture {
    Fixture {
        league: "Serie A".to_string(),
        date: date(20),
        home: home.to_string(),
        away: away.to_string(),
        odds,
    }
}

#[test]
fn row_slots_follow_declared_order() {
    let form = FormTracker::default().pre_match_form("Napoli", "Genoa");
    let row = FeatureRowBuilder::default()
        .build((1510.0, 1490.0), &form, MarketOdds::new(1.5, 4.0, 6.5))
        .expect("columns agree");
    assert_eq!(
        row.to_array(),
        [1510.0, 1490.0, 1.5, 4.0, 6.5, 5.0, 5.0, 1.5, 1.5, 1.5, 1.5]
    );
    let names: Vec<&str> = row.named().into_iter().map(|(n, _)| n).collect();
    assert_eq!(
        names,
        vec![
            "elo_home", "elo_away", "odds_home", "odds_draw", "odds_away", "h_form", "a_form",
            "h_att", "a_att", "h_def", "a_def"
        ]
    );
}

#[test]
fn reordered_scorer_columns_fail_loudly() {
    let mut columns: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.swap(7, 9);
    let builder = FeatureRowBuilder::new(columns.clone());
    let form = FormTracker::default().pre_match_form("Napoli", "Genoa");
    let err = builder
        .build((1500.0, 1500.0), &form, MarketOdds::UNKNOWN)
        .expect_err("h_att and h_def swapped");
    match err {
        EngineError::FeatureColumnMismatch { expected, actual } => {
            assert_eq!(expected, columns);
            assert_eq!(actual.len(), FEATURE_COLUMNS.len());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_column_fails_the_pass() {
    let mut columns: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.pop();
    let mut engine = MatchEngine::new(EngineConfig::default())
        .expect("valid config")
        .with_feature_columns(columns);
    let matches = vec![MatchRecord {
        league: "Serie A".to_string(),
        date: date(1),
        home: "Inter".to_string(),
        away: "Como".to_string(),
        goals_home: Some(2),
        goals_away: Some(0),
        odds: MarketOdds::UNKNOWN,
    }];
    let err = engine.process(&matches).expect_err("short column list");
    assert!(matches!(err, EngineError::FeatureColumnMismatch { .. }));
    assert_eq!(engine.processed(), 0);
}

#[test]
fn unknown_odds_pass_through_as_sentinel() {
    let mut engine = MatchEngine::new(EngineConfig::default()).expect("valid config");
    let rows = engine
        .process(&[MatchRecord {
            league: "Serie A".to_string(),
            date: date(1),
            home: "Inter".to_string(),
            away: "Como".to_string(),
            goals_home: Some(2),
            goals_away: Some(0),
            odds: MarketOdds::UNKNOWN,
        }])
        .expect("backfill without odds");
    assert_eq!(rows[0].features.odds_home, 0.0);
    assert_eq!(rows[0].features.odds_draw, 0.0);
    assert_eq!(rows[0].outcome, Outcome::HomeWin);

    let view = engine
        .view_fixture(&fixture("Como", "Inter", MarketOdds::UNKNOWN), false)
        .expect("view");
    assert_eq!(view.odds, MarketOdds::UNKNOWN);
    assert!(!view.unrated);
}

#[test]
fn predictions_use_fixture_snapshots() {
    let mut engine = MatchEngine::new(EngineConfig::default()).expect("valid config");
    engine
        .process(&[MatchRecord {
            league: "Serie A".to_string(),
            date: date(1),
            home: "Inter".to_string(),
            away: "Como".to_string(),
            goals_home: Some(3),
            goals_away: Some(1),
            odds: MarketOdds::new(1.3, 5.5, 9.0),
        }])
        .expect("history");

    let fixtures = vec![
        fixture("Inter", "Roma", MarketOdds::new(1.8, 3.6, 4.4)),
        fixture("Como", "Inter", MarketOdds::UNKNOWN),
        fixture("Cagliari", "Lecce", MarketOdds::UNKNOWN),
    ];
    let preds = engine
        .predict(&fixtures, &FixedScorer::fitted(), true)
        .expect("scorer columns agree");
    assert_eq!(preds.len(), 3);

    assert_eq!(preds[0].score.label, Outcome::HomeWin);
    assert_eq!(preds[0].view.odds, MarketOdds::new(1.8, 3.6, 4.4));
    assert_eq!(preds[0].score.goals_home, 3.0);

    // Como is the weaker side, so synthesized odds favour the visitors.
    let como = &preds[1];
    assert_eq!(como.score.label, Outcome::AwayWin);
    assert!(como.view.odds.home > como.view.odds.away);
    assert_eq!(como.view.odds.draw, 3.60);
    assert!(!como.view.unrated);

    let unrated = &preds[2];
    assert!(unrated.view.unrated);
    assert_eq!(unrated.view.odds, MarketOdds::new(2.0, 3.60, 2.0));

    // Snapshots never register teams.
    assert_eq!(engine.ratings().rating("Cagliari"), None);
}

#[test]
fn mismatched_scorer_is_rejected_before_scoring() {
    let engine = MatchEngine::new(EngineConfig::default()).expect("valid config");
    let scorer = FixedScorer {
        columns: vec!["elo_diff".to_string()],
    };
    let err = engine
        .predict(&[fixture("Torino", "Parma", MarketOdds::UNKNOWN)], &scorer, false)
        .expect_err("foreign column list");
    assert!(matches!(err, EngineError::FeatureColumnMismatch { .. }));
}
