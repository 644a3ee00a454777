use chrono::{Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchday_engine::{EngineConfig, Fixture, MarketOdds, MatchEngine, MatchRecord};

// 20-team double round robin, five seasons back to back.
fn sample_history() -> Vec<MatchRecord> {
    let teams: Vec<String> = (0..20).map(|i| format!("Team {i:02}")).collect();
    let start = NaiveDate::from_ymd_opt(2019, 8, 9).expect("valid date");
    let mut out = Vec::new();
    let mut day = 0i64;
    for season in 0..5usize {
        for (i, home) in teams.iter().enumerate() {
            for (j, away) in teams.iter().enumerate() {
                if i == j {
                    continue;
                }
                let gh = ((i * 7 + j * 3 + season) % 5) as u8;
                let ga = ((i * 2 + j * 5 + season) % 4) as u8;
                out.push(MatchRecord {
                    league: "Premier League".to_string(),
                    date: start + Duration::days(day / 10),
                    home: home.clone(),
                    away: away.clone(),
                    goals_home: Some(gh),
                    goals_away: Some(ga),
                    odds: MarketOdds::new(2.2, 3.4, 3.3),
                });
                day += 1;
            }
        }
    }
    out
}

fn bench_full_pass(c: &mut Criterion) {
    let history = sample_history();
    c.bench_function("full_pass_1900_matches", |b| {
        b.iter(|| {
            let mut engine = MatchEngine::new(EngineConfig::default()).unwrap();
            let rows = engine.process(black_box(&history)).unwrap();
            black_box(rows.len());
        })
    });
}

fn bench_fixture_views(c: &mut Criterion) {
    let history = sample_history();
    let mut engine = MatchEngine::new(EngineConfig::default()).unwrap();
    engine.process(&history).unwrap();
    let fixtures: Vec<Fixture> = (0..10)
        .map(|i| Fixture {
            league: "Premier League".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            home: format!("Team {:02}", i * 2),
            away: format!("Team {:02}", i * 2 + 1),
            odds: MarketOdds::UNKNOWN,
        })
        .collect();

    c.bench_function("fixture_views_10", |b| {
        b.iter(|| {
            for f in &fixtures {
                let view = engine.view_fixture(black_box(f), true).unwrap();
                black_box(view.features.to_array());
            }
        })
    });
}

criterion_group!(benches, bench_full_pass, bench_fixture_views);
criterion_main!(benches);
