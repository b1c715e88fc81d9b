//! Movement between two leaderboard snapshots

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Leaderboard;

/// How one team moved between two snapshots.
///
/// `change` is `current - previous`: positive means the team dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMovement {
    pub team_id: String,
    pub previous_position: Option<u32>,
    pub current_position: Option<u32>,
    pub change: Option<i64>,
}

impl TeamMovement {
    pub fn entered(&self) -> bool {
        self.previous_position.is_none() && self.current_position.is_some()
    }

    pub fn left(&self) -> bool {
        self.previous_position.is_some() && self.current_position.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardDiff {
    /// Teams in the current snapshot by position, then departed teams by id
    pub movements: Vec<TeamMovement>,
}

impl LeaderboardDiff {
    pub fn between(previous: &Leaderboard, current: &Leaderboard) -> Self {
        let before: BTreeMap<&str, u32> = previous
            .entries
            .iter()
            .map(|e| (e.team_id.as_str(), e.position))
            .collect();

        let mut movements: Vec<TeamMovement> = current
            .entries
            .iter()
            .map(|entry| {
                let previous_position = before.get(entry.team_id.as_str()).copied();
                TeamMovement {
                    team_id: entry.team_id.clone(),
                    previous_position,
                    current_position: Some(entry.position),
                    change: previous_position
                        .map(|p| i64::from(entry.position) - i64::from(p)),
                }
            })
            .collect();

        for (team_id, position) in before {
            if current.entry(team_id).is_none() {
                movements.push(TeamMovement {
                    team_id: team_id.to_string(),
                    previous_position: Some(position),
                    current_position: None,
                    change: None,
                });
            }
        }

        Self { movements }
    }

    pub fn movement(&self, team_id: &str) -> Option<&TeamMovement> {
        self.movements.iter().find(|m| m.team_id == team_id)
    }
}
