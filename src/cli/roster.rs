//! Event, team and submission subcommands

use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::parse::parse_timestamp;

#[derive(Subcommand, Debug)]
pub enum EventCommands {
    /// Create an event judged with the given rubric
    Add {
        /// Event ID
        id: String,

        /// Rubric ID (stored or built-in template)
        #[arg(long, short)]
        rubric: String,

        /// Display name (defaults to the ID)
        #[arg(long)]
        name: Option<String>,
    },

    /// List events
    List,
}

#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    /// Register a team
    Add {
        /// Team ID
        id: String,

        /// Display name
        #[arg(long)]
        name: String,

        /// Enter the team into an event (repeatable)
        #[arg(long, action = clap::ArgAction::Append)]
        event: Vec<String>,
    },

    /// List teams
    List,
}

#[derive(Subcommand, Debug)]
pub enum SubmissionCommands {
    /// Record a team's submission to an event
    Add {
        /// Submission ID
        id: String,

        #[arg(long)]
        team: String,

        #[arg(long)]
        event: String,

        /// Submission time (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<DateTime<Utc>>,
    },
}
