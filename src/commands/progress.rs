//! `tally progress` command - judging coverage for an event

use crate::cli::{Cli, OutputFormat};
use crate::commands::format::{precision, print_json, print_records_header};
use tally_core::engine::event_progress;
use tally_core::error::Result;
use tally_core::format::format_score;
use tally_core::records::format_progress_record;
use tally_core::store::Store;

pub fn execute(cli: &Cli, store: &Store, event_id: &str) -> Result<()> {
    let progress = event_progress(store.db(), event_id)?;
    let precision = precision(store);

    match cli.format {
        OutputFormat::Json => print_json(&progress)?,
        OutputFormat::Human => {
            println!(
                "{}: {}/{} submissions fully judged ({}%), {} judge{}",
                progress.event_id,
                progress.complete_submissions,
                progress.submissions.len(),
                format_score(progress.completion_rate(), 0),
                progress.judges.len(),
                if progress.judges.len() == 1 { "" } else { "s" }
            );
            for submission in &progress.submissions {
                let missing = if submission.missing_judges.is_empty() {
                    String::new()
                } else {
                    format!("  missing: {}", submission.missing_judges.join(", "))
                };
                println!(
                    "  {:<20} {:<16} {:>7}%{}",
                    submission.submission_id,
                    submission.team_id,
                    format_score(submission.completion_percentage, precision),
                    missing
                );
            }
        }
        OutputFormat::Records => {
            print_records_header(
                "progress",
                &format!(
                    "event={} judges={} complete={}",
                    progress.event_id,
                    progress.judges.len(),
                    progress.complete_submissions
                ),
            );
            for submission in &progress.submissions {
                println!("{}", format_progress_record(submission, precision));
            }
        }
    }
    Ok(())
}
