//! Command implementations for all tally commands

use crate::cli::{
    Commands, EventCommands, RubricCommands, ScoreCommands, SubmissionCommands, TeamCommands,
};
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{aggregate, history, init, leaderboard, progress, roster, rubric, score};
use tally_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Init { visible, remember } => {
                init::execute(ctx.cli, ctx.root, *visible, *remember)
            }
            Commands::Rubric { command } => execute_rubric(ctx, command),
            Commands::Event { command } => execute_event(ctx, command),
            Commands::Team { command } => execute_team(ctx, command),
            Commands::Submission { command } => execute_submission(ctx, command),
            Commands::Score { command } => execute_score(ctx, command),
            Commands::Aggregate { submission } => {
                let store = ctx.discover_or_open_store()?;
                aggregate::execute(ctx.cli, &store, submission)
            }
            Commands::Leaderboard(args) => {
                let store = ctx.discover_or_open_store()?;
                leaderboard::execute(ctx.cli, &store, args, ctx.now())
            }
            Commands::Progress { event } => {
                let store = ctx.discover_or_open_store()?;
                progress::execute(ctx.cli, &store, event)
            }
            Commands::History(args) => {
                let store = ctx.discover_or_open_store()?;
                history::execute_history(ctx.cli, &store, args)
            }
            Commands::Trend(args) => {
                let store = ctx.discover_or_open_store()?;
                history::execute_trend(ctx.cli, &store, args, ctx.now())
            }
            Commands::Positions { team, event } => {
                let store = ctx.discover_or_open_store()?;
                history::execute_positions(ctx.cli, &store, team, event.as_deref())
            }
        }
    }
}

fn execute_rubric(ctx: &CommandContext, command: &RubricCommands) -> Result<()> {
    match command {
        RubricCommands::Validate { file } => rubric::validate(ctx.cli, file),
        RubricCommands::Add { file, update } => {
            rubric::add(ctx.cli, &ctx.discover_or_open_store()?, file, *update)
        }
        RubricCommands::List => rubric::list(ctx.cli, &ctx.discover_or_open_store()?),
        RubricCommands::Show { id } => rubric::show(ctx.cli, &ctx.discover_or_open_store()?, id),
        RubricCommands::Templates => rubric::templates(ctx.cli, &ctx.discover_or_open_store()?),
        RubricCommands::Clone {
            id,
            new_id,
            event,
            group,
            name,
        } => rubric::clone(
            ctx.cli,
            &ctx.discover_or_open_store()?,
            id,
            new_id,
            rubric::clone_scope(event.as_deref(), group.as_deref()),
            name.as_deref(),
        ),
    }
}

fn execute_event(ctx: &CommandContext, command: &EventCommands) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    match command {
        EventCommands::Add { id, rubric, name } => {
            roster::add_event(ctx.cli, &store, id, rubric, name.as_deref(), ctx.now())
        }
        EventCommands::List => roster::list_events(ctx.cli, &store),
    }
}

fn execute_team(ctx: &CommandContext, command: &TeamCommands) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    match command {
        TeamCommands::Add { id, name, event } => {
            roster::add_team(ctx.cli, &store, id, name, event, ctx.now())
        }
        TeamCommands::List => roster::list_teams(ctx.cli, &store),
    }
}

fn execute_submission(ctx: &CommandContext, command: &SubmissionCommands) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    match command {
        SubmissionCommands::Add {
            id,
            team,
            event,
            at,
        } => roster::add_submission(
            ctx.cli,
            &store,
            id,
            team,
            event,
            at.unwrap_or_else(|| ctx.now()),
        ),
    }
}

fn execute_score(ctx: &CommandContext, command: &ScoreCommands) -> Result<()> {
    let store = ctx.discover_or_open_store()?;
    match command {
        ScoreCommands::Set {
            submission,
            judge,
            comment,
            values,
        } => score::set(
            ctx.cli,
            &store,
            submission,
            judge,
            comment.as_deref(),
            values,
            ctx.now(),
        ),
        ScoreCommands::List { submission } => score::list(ctx.cli, &store, submission),
    }
}
