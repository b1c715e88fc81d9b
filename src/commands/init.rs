//! `tally init` command - create a new store
//!
//! Idempotent: an existing store keeps its config and data.

use std::path::{self, Path};

use serde_json::json;

use crate::cli::paths::resolve_store_path;
use crate::cli::{Cli, OutputFormat};
use crate::commands::format::{print_json_status, print_records_header};
use tally_core::config::GlobalConfig;
use tally_core::error::Result;
use tally_core::store::{InitOptions, Store};

/// Execute the init command
pub fn execute(cli: &Cli, root: &Path, visible: bool, remember: bool) -> Result<()> {
    let store = match cli.store.as_ref() {
        Some(path) => Store::init_at(&resolve_store_path(path, root))?,
        None => Store::init(root, InitOptions { visible })?,
    };
    let store_root = path::absolute(store.root())?;

    if remember {
        let mut global = GlobalConfig::load()?;
        global.default_store = Some(store_root.clone());
        global.save()?;
        tracing::info!(store = %store_root.display(), "remembered default store");
    }

    match cli.format {
        OutputFormat::Json => print_json_status(
            "ok",
            Some("Store initialized"),
            &[
                ("store", json!(store_root.display().to_string())),
                ("remembered", json!(remember)),
            ],
        )?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Initialized tally store at {}", store_root.display());
                if remember {
                    println!(
                        "Saved as default store in {}",
                        GlobalConfig::source_display()
                    );
                }
            }
        }
        OutputFormat::Records => print_records_header(
            "init",
            &format!("store={} status=ok", store_root.display()),
        ),
    }

    Ok(())
}
