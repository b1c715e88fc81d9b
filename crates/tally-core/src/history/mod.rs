//! Derived per-team series: score history, score trend and position history
//!
//! Everything here is computed from inputs and never edited in place.

mod position;
mod score_history;
mod trend;

pub use position::{PositionEntry, PositionHistory};
pub use score_history::{ScoreHistory, ScoreHistoryEntry};
pub use trend::{
    derive_score_trend, ScoreTrend, TrendDirection, TrendWindow, STABLE_THRESHOLD_PERCENT,
};
