//! Argument structs for the ranking and history commands

use chrono::{DateTime, Utc};
use clap::Args;

use super::parse::{parse_direction, parse_sort_field, parse_team_score, parse_timestamp};
use tally_core::leaderboard::{SortDirection, SortField, TeamScorePolicy};

/// Arguments for `leaderboard`; unset flags fall back to `[ranking]` config
#[derive(Args, Debug, Clone)]
pub struct LeaderboardArgs {
    /// Event ID
    pub event: String,

    /// Sort field (average-score, total-score, submission-count, team-name)
    #[arg(long, value_parser = parse_sort_field)]
    pub sort: Option<SortField>,

    /// Sort direction (desc, asc)
    #[arg(long, value_parser = parse_direction)]
    pub direction: Option<SortDirection>,

    /// How a team's total is built from its submissions (highest, sum, average)
    #[arg(long, value_parser = parse_team_score)]
    pub team_score: Option<TeamScorePolicy>,

    /// Drop submissions that are not fully judged
    #[arg(long)]
    pub exclude_incomplete: bool,

    /// Minimum team score to be listed
    #[arg(long)]
    pub min_score: Option<f64>,

    /// Minimum submission count to be listed
    #[arg(long)]
    pub min_submissions: Option<usize>,

    /// Restrict to these teams (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub team: Vec<String>,

    /// Keep only the first N entries
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub top: Option<u64>,

    /// Persist the result as a snapshot for position history
    #[arg(long)]
    pub save: bool,

    /// Show movement against the latest saved snapshot
    #[arg(long)]
    pub diff: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Team ID
    pub team: String,

    /// Only this event's submissions
    #[arg(long)]
    pub event: Option<String>,

    /// Inclusive lower bound (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_timestamp)]
    pub since: Option<DateTime<Utc>>,

    /// Inclusive upper bound (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_timestamp)]
    pub until: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Clone)]
pub struct TrendArgs {
    /// Team ID
    pub team: String,

    /// Only this event's submissions
    #[arg(long)]
    pub event: Option<String>,

    /// Window: entries from the last N days
    #[arg(long, conflicts_with_all = ["last", "since", "until"])]
    pub last_days: Option<u32>,

    /// Window: the last N entries
    #[arg(long, conflicts_with_all = ["since", "until"])]
    pub last: Option<usize>,

    /// Window start (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_timestamp, requires = "until")]
    pub since: Option<DateTime<Utc>>,

    /// Window end (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_timestamp, requires = "since")]
    pub until: Option<DateTime<Utc>>,
}
