//! `tally score` commands - set and list judge records

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::cli::{Cli, OutputFormat};
use crate::commands::format::{precision, print_json, print_records_header};
use tally_core::error::{Result, ValidationError};
use tally_core::format::format_score;
use tally_core::records::format_score_record;
use tally_core::rubric::{ScoreValue, ScoringRubric};
use tally_core::score::ScoreRecord;
use tally_core::source::{RubricSource, ScoreRecordSource, TeamDirectory};
use tally_core::store::Store;

/// Turn `key=value` arguments into typed values for the rubric's criteria
pub fn parse_values(
    rubric: &ScoringRubric,
    judge_id: &str,
    assignments: &[(String, String)],
) -> Result<BTreeMap<String, ScoreValue>> {
    let mut values = BTreeMap::new();
    for (key, raw) in assignments {
        let criterion = rubric
            .criterion(key)
            .ok_or_else(|| ValidationError::UnknownCriterion {
                rubric_id: rubric.id.clone(),
                key: key.clone(),
            })?;
        let value = ScoreValue::parse_for(criterion, raw).map_err(|reason| {
            ValidationError::InvalidScoreValue {
                key: key.clone(),
                judge_id: judge_id.to_string(),
                reason,
            }
        })?;
        if values.insert(key.clone(), value).is_some() {
            tally_core::bail_usage!(format!("criterion '{}' given more than once", key));
        }
    }
    Ok(values)
}

pub fn set(
    cli: &Cli,
    store: &Store,
    submission_id: &str,
    judge_id: &str,
    comment: Option<&str>,
    assignments: &[(String, String)],
    now: DateTime<Utc>,
) -> Result<()> {
    let db = store.db();
    let submission = db.submission(submission_id)?;
    let event = db.event(&submission.event_id)?;
    let rubric = db.event_rubric(&event)?;

    let values = parse_values(&rubric, judge_id, assignments)?;
    let record = db.set_scores(
        submission_id,
        judge_id,
        values,
        comment.map(str::to_string),
        now,
    )?;
    tracing::info!(
        submission_id,
        judge_id,
        criteria = record.values.len(),
        "recorded scores"
    );

    let precision = precision(store);
    match cli.format {
        OutputFormat::Json => print_json(&record)?,
        OutputFormat::Human => {
            if !cli.quiet {
                let total = record
                    .total
                    .map(|t| format_score(t, precision))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "Recorded {} criteria from {} for {} (judge total {})",
                    record.values.len(),
                    record.judge_id,
                    record.submission_id,
                    total
                );
            }
        }
        OutputFormat::Records => {
            print_records_header("score", "status=recorded");
            println!("{}", format_score_record(&record, precision));
        }
    }
    Ok(())
}

pub fn list(cli: &Cli, store: &Store, submission_id: &str) -> Result<()> {
    // Unknown submissions are an error, not an empty list
    store.db().submission(submission_id)?;
    let records = store.db().records_for_submission(submission_id)?;
    let precision = precision(store);

    match cli.format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Human => output_human(cli, submission_id, &records, precision),
        OutputFormat::Records => {
            print_records_header(
                "scores",
                &format!("submission={} count={}", submission_id, records.len()),
            );
            for record in &records {
                println!("{}", format_score_record(record, precision));
            }
        }
    }
    Ok(())
}

fn output_human(cli: &Cli, submission_id: &str, records: &[ScoreRecord], precision: usize) {
    if records.is_empty() {
        if !cli.quiet {
            println!("No scores for {}", submission_id);
        }
        return;
    }
    for record in records {
        let total = record
            .total
            .map(|t| format_score(t, precision))
            .unwrap_or_else(|| "-".to_string());
        println!("{}  total {}", record.judge_id, total);
        for (key, value) in &record.values {
            println!("  {:<16} {}", key, value);
        }
        if let Some(comment) = &record.comment {
            println!("  \"{}\"", comment);
        }
    }
}
