use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One scored submission in a team's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistoryEntry {
    pub submission_id: String,
    pub event_id: String,
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

impl ScoreHistoryEntry {
    pub fn new(
        submission_id: impl Into<String>,
        event_id: impl Into<String>,
        score: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            submission_id: submission_id.into(),
            event_id: event_id.into(),
            score,
            timestamp,
        }
    }
}

/// Time-ordered score series, ordered by (timestamp, submission id)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreHistory {
    entries: Vec<ScoreHistoryEntry>,
}

impl ScoreHistory {
    pub fn derive(entries: impl IntoIterator<Item = ScoreHistoryEntry>) -> Self {
        let mut entries: Vec<ScoreHistoryEntry> = entries.into_iter().collect();
        entries.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.submission_id.cmp(&b.submission_id))
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[ScoreHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&ScoreHistoryEntry> {
        self.entries.last()
    }

    /// Return a new history with `entry` added at the end.
    ///
    /// Entries older than the latest one are rejected; the series only grows
    /// forward in time.
    pub fn append(&self, entry: ScoreHistoryEntry) -> Result<Self, ValidationError> {
        if let Some(latest) = self.latest() {
            if entry.timestamp < latest.timestamp {
                return Err(ValidationError::OutOfOrderEntry {
                    timestamp: entry.timestamp.to_rfc3339(),
                    latest: latest.timestamp.to_rfc3339(),
                });
            }
        }
        let mut entries = self.entries.clone();
        entries.push(entry);
        Ok(Self::derive(entries))
    }

    /// Entries whose timestamp lies in `[from, to]`
    pub fn between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> impl Iterator<Item = &ScoreHistoryEntry> {
        self.entries
            .iter()
            .filter(move |e| e.timestamp >= from && e.timestamp <= to)
    }

    pub fn average(&self) -> Option<f64> {
        mean(self.entries.iter())
    }

    pub fn highest(&self) -> Option<f64> {
        max(self.entries.iter())
    }

    pub fn lowest(&self) -> Option<f64> {
        min(self.entries.iter())
    }

    pub fn average_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Option<f64> {
        mean(self.between(from, to))
    }

    pub fn highest_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Option<f64> {
        max(self.between(from, to))
    }

    pub fn lowest_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Option<f64> {
        min(self.between(from, to))
    }
}

fn mean<'a>(entries: impl Iterator<Item = &'a ScoreHistoryEntry>) -> Option<f64> {
    let (sum, count) = entries.fold((0.0, 0usize), |(sum, n), e| (sum + e.score, n + 1));
    (count > 0).then(|| sum / count as f64)
}

fn max<'a>(entries: impl Iterator<Item = &'a ScoreHistoryEntry>) -> Option<f64> {
    entries.map(|e| e.score).reduce(f64::max)
}

fn min<'a>(entries: impl Iterator<Item = &'a ScoreHistoryEntry>) -> Option<f64> {
    entries.map(|e| e.score).reduce(f64::min)
}
