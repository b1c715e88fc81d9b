//! Per-user settings, kept outside any store
//!
//! Lives in `<config dir>/tally/config.toml`; `TALLY_CONFIG_DIR` replaces the
//! whole directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TallyError};

const CONFIG_DIR_ENV_VAR: &str = "TALLY_CONFIG_DIR";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Store used when no `--store` is given and none is discovered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_store: Option<PathBuf>,
}

fn config_path() -> Result<PathBuf> {
    let dir = match std::env::var_os(CONFIG_DIR_ENV_VAR) {
        Some(dir) => PathBuf::from(dir),
        None => dirs::config_dir()
            .ok_or_else(|| TallyError::Other("no user config directory on this platform".into()))?
            .join("tally"),
    };
    Ok(dir.join("config.toml"))
}

impl GlobalConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    /// A missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| TallyError::db_operation("read user config", e))?;
        toml::from_str(&content).map_err(|e| {
            TallyError::invalid_value("user config", format!("{}: {}", path.display(), e))
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| TallyError::db_operation("create user config directory", e))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| TallyError::db_operation("serialize user config", e))?;
        fs::write(path, content).map_err(|e| TallyError::db_operation("write user config", e))
    }

    /// Where `save` writes, for messages
    pub fn source_display() -> String {
        config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "user config".to_string())
    }
}
