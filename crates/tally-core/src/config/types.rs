//! Configuration type definitions

use serde::{Deserialize, Serialize};

use crate::leaderboard::{SortDirection, SortField, TeamScorePolicy};

/// Current store format version
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Leaderboard defaults; command-line flags take precedence
    #[serde(default)]
    pub ranking: RankingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default)]
    pub sort: SortField,

    #[serde(default)]
    pub direction: SortDirection,

    #[serde(default)]
    pub team_score: TeamScorePolicy,

    /// Leave incomplete submissions out of rankings
    #[serde(default)]
    pub exclude_incomplete: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Decimal places for scores in human output
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_version() -> u32 {
    STORE_FORMAT_VERSION
}

fn default_precision() -> usize {
    2
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: STORE_FORMAT_VERSION,
            ranking: RankingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}
