use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use matchday_engine::matches::{filter_league, parse_matches_json, sort_chronologically};
use matchday_engine::{EngineConfig, MatchEngine, history_store};

/// Recompute pre-match ratings and form for a match list and store the rows.
#[derive(Parser, Debug)]
#[command(name = "history_rebuild", version, about)]
struct Args {
    /// JSON array of finished matches
    #[arg(long, env = "MATCHES_PATH")]
    matches: PathBuf,

    /// SQLite file receiving the denormalized history
    #[arg(long, env = "HISTORY_DB", default_value = "data/match_history.sqlite")]
    db: PathBuf,

    /// Engine config (JSON); built-in defaults when omitted
    #[arg(long, env = "ENGINE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the Elo K-factor
    #[arg(long, env = "ELO_K_FACTOR")]
    k_factor: Option<f64>,

    /// Override the rating given to unseen teams
    #[arg(long, env = "ELO_BASE_RATING")]
    base_rating: Option<f64>,

    /// Only process matches from this league
    #[arg(long)]
    league: Option<String>,

    /// Standings rows to print
    #[arg(long, default_value = "10")]
    top: usize,
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
    let cfg = resolve_config(&args)?;

    let raw = fs::read_to_string(&args.matches)
        .with_context(|| format!("read matches {}", args.matches.display()))?;
    let mut matches = parse_matches_json(&raw).context("parse matches json")?;
    if let Some(league) = args.league.as_deref() {
        matches = filter_league(matches, league);
    }
    sort_chronologically(&mut matches);
    info!(matches = matches.len(), "loaded match list");

    let mut engine = MatchEngine::new(cfg).context("build engine")?;
    let rows = engine.process(&matches).context("rating/form pass failed")?;

    let mut conn = history_store::open_db(&args.db)?;
    let written = history_store::replace_history(&mut conn, &rows)?;

    println!("History rebuild complete");
    println!("DB: {}", args.db.display());
    println!("Matches written: {written}");
    println!("Teams rated: {}", engine.ratings().len());
    if let Some(last) = engine.last_date() {
        println!("Latest match: {last}");
    }
    for (rank, (team, rating)) in engine
        .ratings()
        .standings()
        .into_iter()
        .take(args.top)
        .enumerate()
    {
        println!("{:>3}. {team:<30} {rating:>7.1}", rank + 1);
    }

    Ok(())
}

fn resolve_config(args: &Args) -> Result<EngineConfig> {
    let mut cfg = match args.config.as_deref() {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("load engine config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(k) = args.k_factor {
        cfg.rating.k_factor = k;
    }
    if let Some(base) = args.base_rating {
        cfg.rating.base_rating = base;
    }
    cfg.validate().context("engine config")?;
    Ok(cfg)
}
