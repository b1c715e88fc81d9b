//! `tally history`, `tally trend` and `tally positions` commands

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::cli::{Cli, HistoryArgs, OutputFormat, TrendArgs};
use crate::commands::format::{precision, print_json, print_records_header};
use tally_core::engine::{team_position_history, team_score_history};
use tally_core::error::Result;
use tally_core::format::format_score;
use tally_core::history::{derive_score_trend, ScoreHistory, TrendWindow};
use tally_core::records::{format_history_record, format_position_record, format_trend_record};
use tally_core::store::Store;

fn optional_score(score: Option<f64>, precision: usize) -> String {
    score
        .map(|s| format_score(s, precision))
        .unwrap_or_else(|| "-".to_string())
}

/// Restrict a history to `[since, until]`; open ends are unbounded
pub fn bounded(
    history: ScoreHistory,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
) -> ScoreHistory {
    if since.is_none() && until.is_none() {
        return history;
    }
    let from = since.unwrap_or(DateTime::<Utc>::MIN_UTC);
    let to = until.unwrap_or(DateTime::<Utc>::MAX_UTC);
    ScoreHistory::derive(history.between(from, to).cloned())
}

pub fn execute_history(cli: &Cli, store: &Store, args: &HistoryArgs) -> Result<()> {
    let history = bounded(
        team_score_history(store.db(), &args.team, args.event.as_deref())?,
        args.since,
        args.until,
    );
    let precision = precision(store);

    match cli.format {
        OutputFormat::Json => print_json(&json!({
            "teamId": args.team,
            "entries": history.entries(),
            "average": history.average(),
            "highest": history.highest(),
            "lowest": history.lowest(),
        }))?,
        OutputFormat::Human => {
            if history.is_empty() {
                if !cli.quiet {
                    println!("No scored submissions for {}", args.team);
                }
                return Ok(());
            }
            for entry in history.entries() {
                println!(
                    "{}  {:<16} {:<20} {:>8}",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.event_id,
                    entry.submission_id,
                    format_score(entry.score, precision)
                );
            }
            if !cli.quiet {
                println!();
                println!(
                    "average {}  highest {}  lowest {}",
                    optional_score(history.average(), precision),
                    optional_score(history.highest(), precision),
                    optional_score(history.lowest(), precision)
                );
            }
        }
        OutputFormat::Records => {
            print_records_header(
                "history",
                &format!("team={} entries={}", args.team, history.len()),
            );
            for entry in history.entries() {
                println!("{}", format_history_record(entry, precision));
            }
        }
    }
    Ok(())
}

/// Window selected by the trend flags; no flag means every entry
pub fn trend_window(args: &TrendArgs) -> TrendWindow {
    if let Some(days) = args.last_days {
        TrendWindow::LastDays { days }
    } else if let Some(count) = args.last {
        TrendWindow::LastEntries { count }
    } else if let (Some(from), Some(to)) = (args.since, args.until) {
        TrendWindow::Range { from, to }
    } else {
        TrendWindow::All
    }
}

pub fn execute_trend(cli: &Cli, store: &Store, args: &TrendArgs, now: DateTime<Utc>) -> Result<()> {
    let history = team_score_history(store.db(), &args.team, args.event.as_deref())?;
    let trend = derive_score_trend(&history, trend_window(args), now);
    let precision = precision(store);

    match cli.format {
        OutputFormat::Json => {
            let mut output = json!(trend);
            if let Some(obj) = output.as_object_mut() {
                obj.insert("teamId".to_string(), json!(args.team));
            }
            print_json(&output)?;
        }
        OutputFormat::Human => {
            println!(
                "{}: {} ({}% per entry over {} point{})",
                args.team,
                trend.direction,
                format_score(trend.magnitude, precision),
                trend.points,
                if trend.points == 1 { "" } else { "s" }
            );
            if !cli.quiet && trend.points >= 2 {
                println!(
                    "  {} -> {} (change {})",
                    optional_score(trend.first_score, precision),
                    optional_score(trend.last_score, precision),
                    format_score(trend.change, precision)
                );
            }
        }
        OutputFormat::Records => {
            print_records_header("trend", &format!("team={}", args.team));
            println!("{}", format_trend_record(&args.team, &trend, precision));
        }
    }
    Ok(())
}

pub fn execute_positions(
    cli: &Cli,
    store: &Store,
    team_id: &str,
    event_id: Option<&str>,
) -> Result<()> {
    let history = team_position_history(store.db(), team_id, event_id)?;
    let precision = precision(store);

    match cli.format {
        OutputFormat::Json => print_json(&json!({
            "teamId": team_id,
            "entries": history.entries(),
            "currentPosition": history.current_position(),
            "bestPosition": history.best_position(),
            "positionChange": history.position_change(),
        }))?,
        OutputFormat::Human => {
            if history.is_empty() {
                if !cli.quiet {
                    println!("No saved leaderboards include {}", team_id);
                }
                return Ok(());
            }
            for entry in history.entries() {
                println!(
                    "{}  {:<16} #{} of {}  ({})",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.event_id,
                    entry.position,
                    entry.total_teams,
                    format_score(entry.score, precision)
                );
            }
            if !cli.quiet {
                let change = match history.position_change() {
                    Some(0) => "unchanged".to_string(),
                    Some(change) if change < 0 => format!("up {}", -change),
                    Some(change) => format!("down {}", change),
                    None => "-".to_string(),
                };
                println!();
                println!(
                    "current #{}  best #{}  last move {}",
                    history.current_position().map_or("-".to_string(), |p| p.to_string()),
                    history.best_position().map_or("-".to_string(), |p| p.to_string()),
                    change
                );
            }
        }
        OutputFormat::Records => {
            print_records_header(
                "positions",
                &format!("team={} entries={}", team_id, history.entries().len()),
            );
            for entry in history.entries() {
                println!("{}", format_position_record(entry, precision));
            }
        }
    }
    Ok(())
}
