//! `tally event`, `tally team` and `tally submission` commands

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use crate::commands::format::{print_json, print_json_status, print_records_header};
use tally_core::error::Result;
use tally_core::records::{format_event_record, format_team_record};
use tally_core::roster::{Event, Submission, Team};
use tally_core::source::RubricSource;
use tally_core::store::Store;

pub fn add_event(
    cli: &Cli,
    store: &Store,
    id: &str,
    rubric_id: &str,
    name: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    // Pin the rubric's current version; later edits do not reach this event
    let rubric = store.db().rubric(rubric_id)?;
    let event = Event {
        id: id.to_string(),
        name: name.unwrap_or(id).to_string(),
        rubric_id: rubric.id,
        rubric_version: rubric.version,
        created_at: now,
    };
    store.db().insert_event(&event)?;
    tracing::info!(
        event_id = %event.id,
        rubric_id = %event.rubric_id,
        rubric_version = event.rubric_version,
        "created event"
    );

    match cli.format {
        OutputFormat::Json => print_json(&event)?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Created event {} (rubric {} v{})",
                    event.id, event.rubric_id, event.rubric_version
                );
            }
        }
        OutputFormat::Records => {
            print_records_header("event", "status=created");
            println!("{}", format_event_record(&event));
        }
    }
    Ok(())
}

pub fn list_events(cli: &Cli, store: &Store) -> Result<()> {
    let events = store.db().list_events()?;
    match cli.format {
        OutputFormat::Json => print_json(&events)?,
        OutputFormat::Human => {
            if events.is_empty() && !cli.quiet {
                println!("No events");
            }
            for event in &events {
                println!(
                    "{:<20} {:<16} v{:<3} {}",
                    event.id, event.rubric_id, event.rubric_version, event.name
                );
            }
        }
        OutputFormat::Records => {
            print_records_header("events", &format!("count={}", events.len()));
            for event in &events {
                println!("{}", format_event_record(event));
            }
        }
    }
    Ok(())
}

pub fn add_team(
    cli: &Cli,
    store: &Store,
    id: &str,
    name: &str,
    events: &[String],
    now: DateTime<Utc>,
) -> Result<()> {
    let team = Team {
        id: id.to_string(),
        name: name.to_string(),
        created_at: now,
    };
    store.db().insert_team(&team)?;
    for event_id in events {
        store.db().add_participant(event_id, &team.id)?;
    }
    tracing::info!(team_id = %team.id, events = events.len(), "registered team");

    match cli.format {
        OutputFormat::Json => print_json_status(
            "created",
            None,
            &[("team", json!(team)), ("events", json!(events))],
        )?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Registered team {} ({})", team.id, team.name);
                for event_id in events {
                    println!("  entered {}", event_id);
                }
            }
        }
        OutputFormat::Records => {
            print_records_header("team", "status=created");
            println!("{}", format_team_record(&team));
        }
    }
    Ok(())
}

pub fn list_teams(cli: &Cli, store: &Store) -> Result<()> {
    let teams = store.db().list_teams()?;
    match cli.format {
        OutputFormat::Json => print_json(&teams)?,
        OutputFormat::Human => {
            if teams.is_empty() && !cli.quiet {
                println!("No teams");
            }
            for team in &teams {
                println!("{:<20} {}", team.id, team.name);
            }
        }
        OutputFormat::Records => {
            print_records_header("teams", &format!("count={}", teams.len()));
            for team in &teams {
                println!("{}", format_team_record(team));
            }
        }
    }
    Ok(())
}

pub fn add_submission(
    cli: &Cli,
    store: &Store,
    id: &str,
    team_id: &str,
    event_id: &str,
    submitted_at: DateTime<Utc>,
) -> Result<()> {
    let submission = Submission {
        id: id.to_string(),
        team_id: team_id.to_string(),
        event_id: event_id.to_string(),
        submitted_at,
    };
    store.db().insert_submission(&submission)?;

    match cli.format {
        OutputFormat::Json => print_json(&submission)?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Recorded submission {} for {} in {}",
                    submission.id, submission.team_id, submission.event_id
                );
            }
        }
        OutputFormat::Records => {
            print_records_header(
                "submission",
                &format!(
                    "status=created id={} team={} event={} at={}",
                    submission.id,
                    submission.team_id,
                    submission.event_id,
                    submission.submitted_at.to_rfc3339()
                ),
            );
        }
    }
    Ok(())
}
