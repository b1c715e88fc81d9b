//! Store configuration for tally
//!
//! Configuration is stored in `.tally/config.toml`. A missing file or a
//! missing section falls back to defaults.

pub mod global;
pub mod types;

use std::fs;
use std::path::Path;

use crate::error::{Result, TallyError};
use crate::leaderboard::RankingOptions;

pub use global::GlobalConfig;
pub use types::{OutputConfig, RankingConfig, StoreConfig, STORE_FORMAT_VERSION};

/// Scores never need more digits than the ranker compares
const MAX_PRECISION: usize = 6;

impl StoreConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| TallyError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.version > STORE_FORMAT_VERSION {
            return Err(TallyError::unsupported(
                "store format version",
                self.version,
                format!("<= {}", STORE_FORMAT_VERSION),
            ));
        }
        if self.output.precision > MAX_PRECISION {
            crate::bail_invalid!("output.precision", self.output.precision);
        }
        if self.ranking.top == Some(0) {
            crate::bail_invalid!("ranking.top", 0);
        }
        Ok(())
    }

    /// Ranking options seeded from the `[ranking]` section
    pub fn ranking_options(&self) -> RankingOptions {
        RankingOptions::new()
            .with_sort(self.ranking.sort, self.ranking.direction)
            .with_team_score(self.ranking.team_score)
            .with_exclude_incomplete(self.ranking.exclude_incomplete)
            .with_top(self.ranking.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::{SortDirection, SortField, TeamScorePolicy};
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.version, STORE_FORMAT_VERSION);
        assert_eq!(config.output.precision, 2);
        assert_eq!(config.ranking_options(), RankingOptions::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[ranking]\nsort = \"total-score\"\nteam_score = \"sum\"\n",
        )
        .unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.ranking.sort, SortField::TotalScore);
        assert_eq!(config.ranking.direction, SortDirection::Descending);
        assert_eq!(config.output.precision, 2);

        let options = config.ranking_options();
        assert_eq!(options.team_score, TeamScorePolicy::Sum);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = StoreConfig::default();
        config.ranking.exclude_incomplete = true;
        config.ranking.top = Some(5);
        config.output.precision = 1;
        config.save(&path).unwrap();

        assert_eq!(StoreConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        fs::write(&path, "[output]\nprecision = 12\n").unwrap();
        assert!(matches!(
            StoreConfig::load(&path),
            Err(TallyError::InvalidValue { .. })
        ));

        fs::write(&path, "[ranking]\nsort = \"vibes\"\n").unwrap();
        assert!(matches!(
            StoreConfig::load(&path),
            Err(TallyError::Toml(_))
        ));

        fs::write(&path, "version = 9\n").unwrap();
        assert!(matches!(
            StoreConfig::load(&path),
            Err(TallyError::Unsupported { .. })
        ));
    }
}
