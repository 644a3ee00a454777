use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};

use crate::engine::{HistoryRow, PreMatch};
use crate::features::FeatureRowBuilder;
use crate::form::{FormSnapshot, SideForm};
use crate::matches::{MarketOdds, MatchRecord, Outcome};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS match_history (
            row_id INTEGER PRIMARY KEY AUTOINCREMENT,
            league TEXT NOT NULL,
            match_date TEXT NOT NULL,
            home TEXT NOT NULL,
            away TEXT NOT NULL,
            goals_home INTEGER NOT NULL,
            goals_away INTEGER NOT NULL,
            odds_home REAL NOT NULL,
            odds_draw REAL NOT NULL,
            odds_away REAL NOT NULL,
            outcome TEXT NOT NULL,
            elo_home REAL NOT NULL,
            elo_away REAL NOT NULL,
            h_form INTEGER NOT NULL,
            a_form INTEGER NOT NULL,
            h_att REAL NOT NULL,
            a_att REAL NOT NULL,
            h_def REAL NOT NULL,
            a_def REAL NOT NULL,
            h_window INTEGER NOT NULL,
            a_window INTEGER NOT NULL,
            written_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_history_date ON match_history(match_date);
        CREATE INDEX IF NOT EXISTS idx_history_league ON match_history(league);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Drop every stored row and write the output of a full recompute pass.
pub fn replace_history(conn: &mut Connection, rows: &[HistoryRow]) -> Result<usize> {
    let tx = conn.transaction().context("begin recompute transaction")?;
    tx.execute("DELETE FROM match_history", [])
        .context("clear match history")?;
    for row in rows {
        insert_row(&tx, row)?;
    }
    tx.commit().context("commit recompute transaction")?;
    Ok(rows.len())
}

/// Append rows produced by an incremental pass after the stored ones.
pub fn append_history(conn: &mut Connection, rows: &[HistoryRow]) -> Result<usize> {
    let tx = conn.transaction().context("begin append transaction")?;
    for row in rows {
        insert_row(&tx, row)?;
    }
    tx.commit().context("commit append transaction")?;
    Ok(rows.len())
}

pub fn count_rows(conn: &Connection) -> Result<usize> {
    let n = conn
        .query_row("SELECT COUNT(*) FROM match_history", [], |row| {
            row.get::<_, i64>(0)
        })
        .context("count match history")?;
    Ok(usize::try_from(n).unwrap_or(0))
}

pub fn load_history(conn: &Connection) -> Result<Vec<HistoryRow>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                league, match_date, home, away, goals_home, goals_away,
                odds_home, odds_draw, odds_away, outcome,
                elo_home, elo_away, h_form, a_form, h_att, a_att, h_def, a_def,
                h_window, a_window
            FROM match_history
            ORDER BY row_id ASC
            "#,
        )
        .context("prepare load history query")?;

    let builder = FeatureRowBuilder::default();
    let rows = stmt
        .query_map([], decode_row)
        .context("query match history")?;

    let mut out = Vec::new();
    for row in rows {
        let mut row = row.context("decode history row")?;
        row.features = builder
            .build((row.pre.elo_home, row.pre.elo_away), &row.pre.form, row.odds)
            .context("rebuild stored feature row")?;
        out.push(row);
    }
    Ok(out)
}

/// Stored matches in their original processing order, ready for a replay.
pub fn load_matches(conn: &Connection) -> Result<Vec<MatchRecord>> {
    Ok(load_history(conn)?
        .iter()
        .map(HistoryRow::to_match_record)
        .collect())
}

fn insert_row(tx: &rusqlite::Transaction<'_>, row: &HistoryRow) -> Result<()> {
    let form = &row.pre.form;
    tx.execute(
        r#"
        INSERT INTO match_history (
            league, match_date, home, away, goals_home, goals_away,
            odds_home, odds_draw, odds_away, outcome,
            elo_home, elo_away, h_form, a_form, h_att, a_att, h_def, a_def,
            h_window, a_window, written_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6,
            ?7, ?8, ?9, ?10,
            ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18,
            ?19, ?20, ?21
        )
        "#,
        params![
            row.league,
            row.date.format(DATE_FORMAT).to_string(),
            row.home,
            row.away,
            row.goals_home,
            row.goals_away,
            row.odds.home,
            row.odds.draw,
            row.odds.away,
            row.outcome.code().to_string(),
            row.pre.elo_home,
            row.pre.elo_away,
            form.home.points,
            form.away.points,
            form.home.attack,
            form.away.attack,
            form.home.defense,
            form.away.defense,
            form.home.window_matches as i64,
            form.away.window_matches as i64,
            Utc::now().to_rfc3339(),
        ],
    )
    .context("insert history row")?;
    Ok(())
}

fn decode_row(row: &Row<'_>) -> rusqlite::Result<HistoryRow> {
    let raw_date: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&raw_date, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    let raw_outcome: String = row.get(9)?;
    let outcome = Outcome::from_code(&raw_outcome).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            9,
            Type::Text,
            Box::new(std::io::Error::other(format!(
                "unknown outcome code {raw_outcome:?}"
            ))),
        )
    })?;

    let form = FormSnapshot {
        home: SideForm {
            points: row.get(12)?,
            attack: row.get(14)?,
            defense: row.get(16)?,
            window_matches: row.get::<_, i64>(18)?.max(0) as usize,
        },
        away: SideForm {
            points: row.get(13)?,
            attack: row.get(15)?,
            defense: row.get(17)?,
            window_matches: row.get::<_, i64>(19)?.max(0) as usize,
        },
    };

    Ok(HistoryRow {
        league: row.get(0)?,
        date,
        home: row.get(2)?,
        away: row.get(3)?,
        goals_home: row.get(4)?,
        goals_away: row.get(5)?,
        odds: MarketOdds::new(row.get(6)?, row.get(7)?, row.get(8)?),
        outcome,
        pre: PreMatch {
            elo_home: row.get(10)?,
            elo_away: row.get(11)?,
            form,
        },
        features: Default::default(),
    })
}
