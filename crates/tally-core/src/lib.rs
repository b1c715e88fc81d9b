//! Tally Core Library
//!
//! Scoring engine for judged events: rubrics, multi-judge aggregation,
//! leaderboard ranking and trend analysis, plus the SQLite store behind the
//! `tally` command.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod format;
pub mod history;
pub mod leaderboard;
pub mod logging;
pub mod records;
pub mod roster;
pub mod rubric;
pub mod score;
pub mod source;
pub mod store;

pub use aggregate::{aggregate, AggregatedScore};
pub use engine::compute_event_leaderboard;
pub use error::{Result, TallyError, ValidationError};
pub use history::{derive_score_trend, PositionHistory, ScoreHistory};
pub use leaderboard::{rank_leaderboard, Leaderboard, RankingOptions};
