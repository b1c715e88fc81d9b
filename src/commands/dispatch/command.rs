//! Command trait and context for dispatching commands

use std::path::PathBuf;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::cli::paths::resolve_store_path;
use crate::cli::Cli;
use tally_core::config::GlobalConfig;
use tally_core::error::{Result, TallyError};
use tally_core::store::Store;

/// Discover or open a store based on CLI configuration.
///
/// Order: `--store`, then discovery upwards from the root, then the
/// remembered default store from the global config.
pub fn discover_or_open_store(cli: &Cli, root: &PathBuf) -> Result<Store> {
    if let Some(path) = &cli.store {
        return Store::open(&resolve_store_path(path, root));
    }

    match Store::discover(root) {
        Err(TallyError::StoreNotFound { search_root }) => {
            match GlobalConfig::load()?.default_store {
                Some(default_store) => {
                    debug!(store = %default_store.display(), "using remembered default store");
                    Store::open(&default_store)
                }
                None => Err(TallyError::StoreNotFound { search_root }),
            }
        }
        other => other,
    }
}

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    pub fn discover_or_open_store(&self) -> Result<Store> {
        let store = discover_or_open_store(self.cli, self.root)?;
        debug!(elapsed = ?self.start.elapsed(), root = %store.root().display(), "discover_store");
        Ok(store)
    }

    /// The only place the CLI reads the clock
    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("tally {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Scoring, leaderboards and trends for judged events.");
        println!();
        println!("Run `tally --help` for usage information.");
        Ok(())
    }
}
