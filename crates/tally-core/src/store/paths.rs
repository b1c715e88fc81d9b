use std::path::{Path, PathBuf};

use crate::error::{Result, TallyError};

/// Default store directory name (hidden)
pub const DEFAULT_STORE_DIR: &str = ".tally";

/// Visible store directory name
pub const VISIBLE_STORE_DIR: &str = "tally";

/// Configuration filename
pub const CONFIG_FILE: &str = "config.toml";

/// Gitignore filename
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Walk up from `root` until a directory containing a store is found
pub fn discover_store(root: &Path) -> Result<PathBuf> {
    let mut current = root.to_path_buf();

    loop {
        let store_path = current.join(DEFAULT_STORE_DIR);
        if store_path.is_dir() {
            return Ok(store_path);
        }

        let visible_path = current.join(VISIBLE_STORE_DIR);
        if visible_path.join(CONFIG_FILE).is_file() {
            return Ok(visible_path);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(TallyError::StoreNotFound {
                    search_root: root.to_path_buf(),
                });
            }
        }
    }
}
