//! Score trend over a window of a team's history
//!
//! The measure is the least-squares slope of score against data-point index,
//! expressed as a percentage of the window mean. A series is `Stable` while
//! that magnitude stays within [`STABLE_THRESHOLD_PERCENT`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{ScoreHistory, ScoreHistoryEntry};

/// Largest per-point change, in percent of the mean, still reported as stable
pub const STABLE_THRESHOLD_PERCENT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Upward,
    Downward,
    Stable,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Upward => write!(f, "upward"),
            TrendDirection::Downward => write!(f, "downward"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Which part of the history a trend looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TrendWindow {
    #[default]
    All,
    /// Entries within `days` days before `now`
    LastDays { days: u32 },
    LastEntries { count: usize },
    /// Inclusive timestamp range
    Range {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

impl TrendWindow {
    fn select<'a>(
        &self,
        history: &'a ScoreHistory,
        now: DateTime<Utc>,
    ) -> Vec<&'a ScoreHistoryEntry> {
        let entries = history.entries();
        match *self {
            TrendWindow::All => entries.iter().collect(),
            TrendWindow::LastDays { days } => {
                let from = now - Duration::days(i64::from(days));
                history.between(from, now).collect()
            }
            TrendWindow::LastEntries { count } => {
                let skip = entries.len().saturating_sub(count);
                entries.iter().skip(skip).collect()
            }
            TrendWindow::Range { from, to } => history.between(from, to).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreTrend {
    pub direction: TrendDirection,
    /// Percent change per data point relative to the window mean
    pub magnitude: f64,
    pub first_score: Option<f64>,
    pub last_score: Option<f64>,
    /// `last_score - first_score`, 0 for fewer than two points
    pub change: f64,
    pub points: usize,
    pub window: TrendWindow,
}

pub fn derive_score_trend(
    series: &ScoreHistory,
    window: TrendWindow,
    now: DateTime<Utc>,
) -> ScoreTrend {
    let scores: Vec<f64> = window
        .select(series, now)
        .into_iter()
        .map(|e| e.score)
        .collect();

    let first_score = scores.first().copied();
    let last_score = scores.last().copied();
    let (magnitude, change) = match (first_score, last_score) {
        (Some(first), Some(last)) if scores.len() >= 2 => (relative_slope(&scores), last - first),
        _ => (0.0, 0.0),
    };

    ScoreTrend {
        direction: direction_for(magnitude),
        magnitude,
        first_score,
        last_score,
        change,
        points: scores.len(),
        window,
    }
}

fn direction_for(magnitude: f64) -> TrendDirection {
    if magnitude.abs() <= STABLE_THRESHOLD_PERCENT {
        TrendDirection::Stable
    } else if magnitude > 0.0 {
        TrendDirection::Upward
    } else {
        TrendDirection::Downward
    }
}

/// Regression slope over index 0..n, as a percentage of the mean score
fn relative_slope(scores: &[f64]) -> f64 {
    let n = scores.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = scores.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (i, y) in scores.iter().enumerate() {
        let dx = i as f64 - mean_x;
        covariance += dx * (y - mean_y);
        variance += dx * dx;
    }

    if variance == 0.0 || mean_y.abs() < f64::EPSILON {
        return 0.0;
    }
    covariance / variance / mean_y * 100.0
}
