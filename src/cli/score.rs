//! Score subcommands

use clap::Subcommand;

use super::parse::parse_assignment;

#[derive(Subcommand, Debug)]
pub enum ScoreCommands {
    /// Record (or replace) one judge's scores for a submission
    Set {
        /// Submission ID
        submission: String,

        /// Judge ID
        #[arg(long, short)]
        judge: String,

        /// Free-form comment kept with the record
        #[arg(long)]
        comment: Option<String>,

        /// Criterion values as key=value
        #[arg(required = true, value_parser = parse_assignment)]
        values: Vec<(String, String)>,
    },

    /// Show every judge's record for a submission
    List {
        /// Submission ID
        submission: String,
    },
}
