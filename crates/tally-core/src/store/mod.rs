//! Store management for tally
//!
//! The store is the directory holding the configuration and the score
//! database. Default location: `.tally/` (hidden).

pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::db::{Database, DB_FILE};
use crate::error::{Result, TallyError};
use paths::{CONFIG_FILE, DEFAULT_STORE_DIR, GITIGNORE_FILE, VISIBLE_STORE_DIR};

const STORE_GITIGNORE: &str = "tally.db-wal\ntally.db-shm\n";

/// Options for store initialization
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Use visible store directory (`tally/` instead of `.tally/`)
    pub visible: bool,
}

/// The tally store
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
    config: StoreConfig,
    db: Database,
}

impl Store {
    /// Discover a store by walking up from the given root directory
    pub fn discover(root: &Path) -> Result<Self> {
        let store_path = paths::discover_store(root)?;
        Self::open(&store_path)
    }

    /// Open an existing store at the given path
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(TallyError::StoreNotFound {
                search_root: path.to_path_buf(),
            });
        }

        let config_path = path.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            StoreConfig::default()
        };

        let db = Database::open(path)?;

        Ok(Store {
            root: path.to_path_buf(),
            config,
            db,
        })
    }

    /// Initialize a new store under the given project root.
    pub fn init(project_root: &Path, options: InitOptions) -> Result<Self> {
        let store_name = if options.visible {
            VISIBLE_STORE_DIR
        } else {
            DEFAULT_STORE_DIR
        };
        Self::init_at(&project_root.join(store_name))
    }

    /// Initialize a store at an explicit store root path; idempotent.
    pub fn init_at(store_root: &Path) -> Result<Self> {
        fs::create_dir_all(store_root)?;

        let config_path = store_root.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            let config = StoreConfig::default();
            config.save(&config_path)?;
            config
        };

        let gitignore = store_root.join(GITIGNORE_FILE);
        if !gitignore.exists() {
            fs::write(&gitignore, STORE_GITIGNORE)?;
        }

        let db = Database::open(store_root)?;
        tracing::info!(root = %store_root.display(), "initialized store");

        Ok(Store {
            root: store_root.to_path_buf(),
            config,
            db,
        })
    }

    /// Get the store root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// Get the database file path
    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE)
    }

    /// Get the config
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Get the database
    pub fn db(&self) -> &Database {
        &self.db
    }
}
