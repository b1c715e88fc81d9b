//! `tally leaderboard` command - rank an event's teams
//!
//! Flags override the `[ranking]` defaults from the store config. `--save`
//! persists the result as a snapshot; `--diff` compares against the latest
//! snapshot saved before this run.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::cli::{Cli, LeaderboardArgs, OutputFormat};
use crate::commands::format::{precision, print_json, print_records_header};
use tally_core::engine::compute_event_leaderboard;
use tally_core::error::Result;
use tally_core::format::format_score;
use tally_core::leaderboard::{Leaderboard, LeaderboardDiff, RankingOptions};
use tally_core::records::format_entry_record;
use tally_core::source::SnapshotStore;
use tally_core::store::Store;

/// Config defaults with command-line overrides applied
pub fn ranking_options(store: &Store, args: &LeaderboardArgs) -> RankingOptions {
    let defaults = store.config().ranking_options();
    let mut options = defaults
        .clone()
        .with_sort(
            args.sort.unwrap_or(defaults.sort_field),
            args.direction.unwrap_or(defaults.direction),
        )
        .with_team_score(args.team_score.unwrap_or(defaults.team_score))
        .with_exclude_incomplete(args.exclude_incomplete || defaults.exclude_incomplete)
        .with_min_score(args.min_score)
        .with_min_submissions(args.min_submissions)
        .with_top(args.top.map(|n| n as usize).or(defaults.top));
    if !args.team.is_empty() {
        options = options.with_teams(args.team.iter().cloned());
    }
    options
}

pub fn execute(cli: &Cli, store: &Store, args: &LeaderboardArgs, now: DateTime<Utc>) -> Result<()> {
    let options = ranking_options(store, args);
    let leaderboard = compute_event_leaderboard(store.db(), &args.event, &options, now)?;

    let diff = if args.diff {
        store
            .db()
            .snapshots_for_event(&args.event)?
            .last()
            .map(|previous| LeaderboardDiff::between(previous, &leaderboard))
    } else {
        None
    };

    if args.save {
        store.db().save_snapshot(&leaderboard)?;
    }

    let precision = precision(store);
    match cli.format {
        OutputFormat::Json => {
            let mut output = json!(leaderboard);
            if let Some(obj) = output.as_object_mut() {
                obj.insert("saved".to_string(), json!(args.save));
                if let Some(diff) = &diff {
                    obj.insert("diff".to_string(), json!(diff));
                }
            }
            print_json(&output)?;
        }
        OutputFormat::Human => output_human(cli, &leaderboard, diff.as_ref(), args.save, precision),
        OutputFormat::Records => {
            print_records_header(
                "leaderboard",
                &format!(
                    "event={} entries={} sort={} digest={}",
                    leaderboard.event_id,
                    leaderboard.len(),
                    leaderboard.metadata.sort_field,
                    leaderboard.metadata.digest
                ),
            );
            for entry in &leaderboard.entries {
                let mut line = format_entry_record(entry, precision);
                if let Some(change) = diff
                    .as_ref()
                    .and_then(|d| d.movement(&entry.team_id))
                    .and_then(|m| m.change)
                {
                    line.push_str(&format!(" change={}", change));
                }
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn movement_marker(diff: Option<&LeaderboardDiff>, team_id: &str) -> String {
    let Some(movement) = diff.and_then(|d| d.movement(team_id)) else {
        return String::new();
    };
    match movement.change {
        None => "  new".to_string(),
        Some(0) => "  =".to_string(),
        Some(change) if change < 0 => format!("  ▲{}", -change),
        Some(change) => format!("  ▼{}", change),
    }
}

fn output_human(
    cli: &Cli,
    leaderboard: &Leaderboard,
    diff: Option<&LeaderboardDiff>,
    saved: bool,
    precision: usize,
) {
    if leaderboard.is_empty() {
        if !cli.quiet {
            println!("No ranked teams for {}", leaderboard.event_id);
        }
        return;
    }

    for entry in &leaderboard.entries {
        println!(
            "{:>3}. {:<24} avg {:>8}  total {:>8}  ({} submission{}){}",
            entry.position,
            entry.team_name,
            format_score(entry.average_score, precision),
            format_score(entry.total_score, precision),
            entry.submission_count,
            if entry.submission_count == 1 { "" } else { "s" },
            movement_marker(diff, &entry.team_id)
        );
    }

    if let Some(diff) = diff {
        for movement in diff.movements.iter().filter(|m| m.left()) {
            println!("     {} left the leaderboard", movement.team_id);
        }
    }

    if !cli.quiet {
        println!();
        println!(
            "{} of {} teams ranked by {} ({})",
            leaderboard.metadata.teams_ranked,
            leaderboard.metadata.teams_considered,
            leaderboard.metadata.sort_field,
            leaderboard.metadata.sort_direction
        );
        if saved {
            println!("Snapshot saved");
        }
    }
}
