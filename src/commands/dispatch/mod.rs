//! Command dispatch logic for tally

use std::time::Instant;

use crate::cli::paths::resolve_root_path;
use crate::cli::Cli;
use tally_core::error::Result;
use tracing::debug;

mod command;
mod commands;

use command::{Command, CommandContext, NoCommand};

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let root = resolve_root_path(cli.root.clone());

    debug!(elapsed = ?start.elapsed(), "resolve_root");

    let ctx = CommandContext::new(cli, &root, start);

    let result = match &cli.command {
        None => NoCommand.execute(&ctx),
        Some(cmd) => cmd.execute(&ctx),
    };

    debug!(elapsed = ?start.elapsed(), ok = result.is_ok(), "execute_command");
    result
}
