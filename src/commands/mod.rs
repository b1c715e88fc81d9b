//! Command implementations for tally

pub mod aggregate;
pub mod dispatch;
pub mod format;
pub mod history;
pub mod init;
pub mod leaderboard;
pub mod progress;
pub mod roster;
pub mod rubric;
pub mod score;
