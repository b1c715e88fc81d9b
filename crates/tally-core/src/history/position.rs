use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::leaderboard::{Leaderboard, SortField};

/// A team's placement in one leaderboard snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionEntry {
    pub event_id: String,
    pub position: u32,
    pub score: f64,
    pub total_teams: usize,
    pub timestamp: DateTime<Utc>,
}

/// Placements of one team over time, oldest first.
///
/// `position_change` is `latest - previous`, so a positive value means the
/// team dropped (its position number grew) and a negative one means it
/// climbed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionHistory {
    entries: Vec<PositionEntry>,
}

impl PositionHistory {
    pub fn derive(entries: impl IntoIterator<Item = PositionEntry>) -> Self {
        let mut entries: Vec<PositionEntry> = entries.into_iter().collect();
        entries.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.event_id.cmp(&b.event_id))
        });
        Self { entries }
    }

    /// Collect the team's placements from persisted snapshots; snapshots the
    /// team does not appear in are skipped.
    pub fn from_snapshots<'a>(
        team_id: &str,
        snapshots: impl IntoIterator<Item = &'a Leaderboard>,
    ) -> Self {
        Self::derive(snapshots.into_iter().filter_map(|snapshot| {
            let entry = snapshot.entry(team_id)?;
            let score = match snapshot.metadata.sort_field {
                SortField::TotalScore => entry.total_score,
                _ => entry.average_score,
            };
            Some(PositionEntry {
                event_id: snapshot.event_id.clone(),
                position: entry.position,
                score,
                total_teams: snapshot.metadata.teams_ranked,
                timestamp: snapshot.calculated_at,
            })
        }))
    }

    pub fn entries(&self) -> &[PositionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_position(&self) -> Option<u32> {
        self.entries.last().map(|e| e.position)
    }

    pub fn best_position(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.position).min()
    }

    pub fn position_change(&self) -> Option<i64> {
        match self.entries.as_slice() {
            [.., previous, latest] => {
                Some(i64::from(latest.position) - i64::from(previous.position))
            }
            _ => None,
        }
    }
}
