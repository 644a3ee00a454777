use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use matchday_engine::matches::parse_fixtures_json;
use matchday_engine::{EngineConfig, MatchEngine, history_store};

/// Print pre-match ratings, form and feature rows for upcoming fixtures.
#[derive(Parser, Debug)]
#[command(name = "fixture_snapshot", version, about)]
struct Args {
    /// JSON array of upcoming fixtures
    #[arg(long, env = "FIXTURES_PATH")]
    fixtures: PathBuf,

    /// SQLite history written by history_rebuild
    #[arg(long, env = "HISTORY_DB", default_value = "data/match_history.sqlite")]
    db: PathBuf,

    /// Engine config (JSON); must match the one used for the stored history
    #[arg(long, env = "ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Derive odds from ratings when a fixture has no market price
    #[arg(long)]
    synthesize_odds: bool,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = match args.config.as_deref() {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("load engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    let conn = history_store::open_db(&args.db)?;
    let history = history_store::load_matches(&conn)?;
    let mut engine = MatchEngine::new(cfg).context("build engine")?;
    let replayed = engine.replay(&history).context("replay stored history")?;
    info!(replayed, "restored tracker state");

    let raw = fs::read_to_string(&args.fixtures)
        .with_context(|| format!("read fixtures {}", args.fixtures.display()))?;
    let fixtures = parse_fixtures_json(&raw).context("parse fixtures json")?;

    let mut views = Vec::with_capacity(fixtures.len());
    for fixture in &fixtures {
        views.push(engine.view_fixture(fixture, args.synthesize_odds)?);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    for v in &views {
        let f = &v.pre.form;
        println!(
            "{:<12} {:<25} vs {:<25} | elo {:>6.0} {:>6.0} | form {:>2} {:>2} | att {:.2} {:.2} | def {:.2} {:.2} | odds {:.2}/{:.2}/{:.2}{}",
            v.fixture.date,
            v.fixture.home,
            v.fixture.away,
            v.pre.elo_home,
            v.pre.elo_away,
            f.form_home(),
            f.form_away(),
            f.attack_home(),
            f.attack_away(),
            f.defense_home(),
            f.defense_away(),
            v.odds.home,
            v.odds.draw,
            v.odds.away,
            if v.unrated { "  (unrated)" } else { "" }
        );
    }

    Ok(())
}
