//! Ranking options: sort order, team score policy and entry filters

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TallyError;

/// Field a leaderboard is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortField {
    #[default]
    AverageScore,
    TotalScore,
    SubmissionCount,
    TeamName,
}

impl FromStr for SortField {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "average-score" | "average" => Ok(SortField::AverageScore),
            "total-score" | "total" => Ok(SortField::TotalScore),
            "submission-count" | "submissions" => Ok(SortField::SubmissionCount),
            "team-name" | "name" => Ok(SortField::TeamName),
            other => Err(TallyError::unsupported(
                "sort field",
                other,
                "average-score, total-score, submission-count, team-name",
            )),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortField::AverageScore => write!(f, "average-score"),
            SortField::TotalScore => write!(f, "total-score"),
            SortField::SubmissionCount => write!(f, "submission-count"),
            SortField::TeamName => write!(f, "team-name"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

impl FromStr for SortDirection {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "descending" | "desc" => Ok(SortDirection::Descending),
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            other => Err(TallyError::unsupported("sort direction", other, "desc, asc")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Descending => write!(f, "descending"),
            SortDirection::Ascending => write!(f, "ascending"),
        }
    }
}

/// How a team's `totalScore` is derived from its submission totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamScorePolicy {
    /// Best single submission
    #[default]
    Highest,
    /// Sum over all submissions
    Sum,
    /// Mean over all submissions
    Average,
}

impl FromStr for TeamScorePolicy {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "highest" | "best" => Ok(TeamScorePolicy::Highest),
            "sum" => Ok(TeamScorePolicy::Sum),
            "average" | "mean" => Ok(TeamScorePolicy::Average),
            other => Err(TallyError::unsupported(
                "team score policy",
                other,
                "highest, sum, average",
            )),
        }
    }
}

impl fmt::Display for TeamScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamScorePolicy::Highest => write!(f, "highest"),
            TeamScorePolicy::Sum => write!(f, "sum"),
            TeamScorePolicy::Average => write!(f, "average"),
        }
    }
}

/// Everything that shapes a leaderboard without touching aggregation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingOptions {
    pub sort_field: SortField,
    pub direction: SortDirection,
    pub team_score: TeamScorePolicy,
    /// Drop incomplete submissions before grouping by team
    pub exclude_incomplete: bool,
    /// Minimum ranking score (total score when sorting by it, average otherwise)
    pub min_score: Option<f64>,
    pub min_submissions: Option<usize>,
    /// Restrict to these team ids
    pub teams: Option<BTreeSet<String>>,
    /// Keep only the first N positions
    pub top: Option<usize>,
}

impl RankingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(mut self, field: SortField, direction: SortDirection) -> Self {
        self.sort_field = field;
        self.direction = direction;
        self
    }

    pub fn with_team_score(mut self, policy: TeamScorePolicy) -> Self {
        self.team_score = policy;
        self
    }

    pub fn with_exclude_incomplete(mut self, exclude: bool) -> Self {
        self.exclude_incomplete = exclude;
        self
    }

    pub fn with_min_score(mut self, min_score: Option<f64>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_min_submissions(mut self, min_submissions: Option<usize>) -> Self {
        self.min_submissions = min_submissions;
        self
    }

    pub fn with_teams<I, S>(mut self, teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let teams: BTreeSet<String> = teams.into_iter().map(Into::into).collect();
        self.teams = if teams.is_empty() { None } else { Some(teams) };
        self
    }

    pub fn with_top(mut self, top: Option<usize>) -> Self {
        self.top = top;
        self
    }
}
