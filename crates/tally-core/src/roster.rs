//! Events, teams and submissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A judged event; every submission to it is scored with one rubric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub rubric_id: String,
    /// Rubric version the event is judged with; later rubric edits store a
    /// new version and leave this one alone
    pub rubric_version: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub team_id: String,
    pub event_id: String,
    pub submitted_at: DateTime<Utc>,
}
