//! CLI argument parsing for tally
//!
//! Global flags: --root, --store, --format, --quiet, --verbose,
//! --log-level, --log-json

pub mod args;
pub mod parse;
pub mod paths;
pub mod roster;
pub mod rubric;
pub mod score;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{HistoryArgs, LeaderboardArgs, TrendArgs};
use parse::parse_format;
pub use roster::{EventCommands, SubmissionCommands, TeamCommands};
pub use rubric::RubricCommands;
pub use score::ScoreCommands;
pub use tally_core::format::OutputFormat;

/// Tally - scoring, leaderboards and trends for judged events
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Base directory for resolving the store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit store root path
    #[arg(long, global = true, env = "TALLY_STORE")]
    pub store: Option<PathBuf>,

    /// Output format (human, json, records)
    #[arg(long, global = true, value_parser = parse_format, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level or filter directive (e.g. debug, tally_core=trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new tally store
    Init {
        /// Use visible store directory (tally/ instead of .tally/)
        #[arg(long)]
        visible: bool,

        /// Remember this store as the default for commands run elsewhere
        #[arg(long)]
        remember: bool,
    },

    /// Manage scoring rubrics
    Rubric {
        #[command(subcommand)]
        command: RubricCommands,
    },

    /// Manage events
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Manage teams
    Team {
        #[command(subcommand)]
        command: TeamCommands,
    },

    /// Record submissions
    Submission {
        #[command(subcommand)]
        command: SubmissionCommands,
    },

    /// Record and inspect judge scores
    Score {
        #[command(subcommand)]
        command: ScoreCommands,
    },

    /// Combine every judge's scores for a submission
    Aggregate {
        /// Submission ID
        submission: String,
    },

    /// Rank the teams of an event
    Leaderboard(LeaderboardArgs),

    /// Judging coverage for an event
    Progress {
        /// Event ID
        event: String,
    },

    /// A team's aggregated scores over time
    History(HistoryArgs),

    /// Direction and magnitude of a team's scores
    Trend(TrendArgs),

    /// A team's positions across saved leaderboards
    Positions {
        /// Team ID
        team: String,

        /// Only snapshots of this event
        #[arg(long)]
        event: Option<String>,
    },
}
