//! `tally aggregate` command - combine every judge's scores for a submission

use crate::cli::{Cli, OutputFormat};
use crate::commands::format::{precision, print_json, print_records_header};
use tally_core::engine::aggregate_submission;
use tally_core::error::Result;
use tally_core::format::format_score;
use tally_core::records::format_aggregate_records;
use tally_core::store::Store;

pub fn execute(cli: &Cli, store: &Store, submission_id: &str) -> Result<()> {
    let score = aggregate_submission(store.db(), submission_id)?;
    let precision = precision(store);

    match cli.format {
        OutputFormat::Json => print_json(&score)?,
        OutputFormat::Human => {
            println!(
                "{}  {}  ({}% judged, {} judge{}{})",
                score.submission_id,
                format_score(score.total_score, precision),
                format_score(score.completion_percentage, 0),
                score.contributing_judge_count,
                if score.contributing_judge_count == 1 { "" } else { "s" },
                if score.is_complete { "" } else { ", incomplete" }
            );
            for (key, average) in &score.per_criterion_averages {
                println!(
                    "  {:<16} avg {:<8} normalized {:<8} judges {}",
                    key,
                    format_score(average.average, precision),
                    format_score(average.normalized, precision),
                    average.contributing_judges
                );
            }
        }
        OutputFormat::Records => {
            print_records_header(
                "aggregate",
                &format!("rubric={} version={}", score.rubric_id, score.rubric_version),
            );
            for line in format_aggregate_records(&score, precision) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
