//! `tally rubric` commands - add, list, show, validate, templates, clone

use std::path::Path;

use serde_json::json;

use crate::cli::{Cli, OutputFormat};
use crate::commands::format::{print_json, print_json_status, print_records_header};
use tally_core::error::{Result, ValidationError};
use tally_core::records::{format_criterion_record, format_rubric_record};
use tally_core::rubric::{RubricScope, ScoringRubric};
use tally_core::source::RubricSource;
use tally_core::store::Store;

/// Scope for `rubric clone`: `--event` or `--group`, else a template
pub fn clone_scope(event: Option<&str>, group: Option<&str>) -> RubricScope {
    match (event, group) {
        (Some(event), _) => RubricScope::Event(event.to_string()),
        (None, Some(group)) => RubricScope::Group(group.to_string()),
        (None, None) => RubricScope::Template,
    }
}

pub fn add(cli: &Cli, store: &Store, file: &Path, update: bool) -> Result<()> {
    let rubric = ScoringRubric::load(file)?;
    if update {
        store.db().update_rubric(&rubric)?;
    } else {
        store.db().insert_rubric(&rubric)?;
    }
    let action = if update { "updated" } else { "added" };
    tracing::info!(rubric_id = %rubric.id, version = rubric.version, action, "stored rubric");

    match cli.format {
        OutputFormat::Json => print_json_status(
            action,
            None,
            &[
                ("id", json!(rubric.id)),
                ("version", json!(rubric.version)),
            ],
        )?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Rubric {} {} (version {}, {} criteria)",
                    rubric.id,
                    action,
                    rubric.version,
                    rubric.criteria.len()
                );
            }
        }
        OutputFormat::Records => {
            print_records_header("rubric", &format!("status={}", action));
            println!("{}", format_rubric_record(&rubric));
        }
    }
    Ok(())
}

pub fn list(cli: &Cli, store: &Store) -> Result<()> {
    let rubrics = store.db().list_rubrics()?;
    output_rubric_list(cli, "rubrics", &rubrics)
}

pub fn templates(cli: &Cli, store: &Store) -> Result<()> {
    let templates = store.db().templates()?;
    output_rubric_list(cli, "templates", &templates)
}

fn output_rubric_list(cli: &Cli, mode: &str, rubrics: &[ScoringRubric]) -> Result<()> {
    match cli.format {
        OutputFormat::Json => print_json(rubrics)?,
        OutputFormat::Human => {
            if rubrics.is_empty() {
                if !cli.quiet {
                    println!("No {}", mode);
                }
                return Ok(());
            }
            for rubric in rubrics {
                println!(
                    "{:<20} v{:<3} {:<16} {}",
                    rubric.id,
                    rubric.version,
                    rubric.scope.to_string(),
                    rubric.name
                );
            }
        }
        OutputFormat::Records => {
            print_records_header(mode, &format!("count={}", rubrics.len()));
            for rubric in rubrics {
                println!("{}", format_rubric_record(rubric));
            }
        }
    }
    Ok(())
}

pub fn show(cli: &Cli, store: &Store, id: &str) -> Result<()> {
    let rubric = store.db().rubric(id)?;
    output_rubric(cli, &rubric)
}

fn output_rubric(cli: &Cli, rubric: &ScoringRubric) -> Result<()> {
    match cli.format {
        OutputFormat::Json => print_json(rubric)?,
        OutputFormat::Human => {
            println!("{} ({})", rubric.name, rubric.id);
            println!("Scope: {}  Version: {}", rubric.scope, rubric.version);
            if let Some(description) = &rubric.description {
                println!("{}", description);
            }
            println!();
            for criterion in &rubric.criteria {
                println!(
                    "  {:<16} {:<8} max {:<6} weight {:<5}{}",
                    criterion.key,
                    criterion.criterion_type.to_string(),
                    criterion.max_score,
                    criterion.weight,
                    if criterion.required { " required" } else { "" }
                );
            }
        }
        OutputFormat::Records => {
            print_records_header("rubric", "");
            println!("{}", format_rubric_record(rubric));
            for criterion in &rubric.criteria {
                println!("{}", format_criterion_record(&rubric.id, criterion));
            }
        }
    }
    Ok(())
}

/// Check a rubric file; an invalid rubric is reported and fails with exit 3
pub fn validate(cli: &Cli, file: &Path) -> Result<()> {
    let rubric = ScoringRubric::load(file)?;
    let errors = rubric.validate();

    if errors.is_empty() {
        match cli.format {
            OutputFormat::Json => print_json_status(
                "valid",
                None,
                &[
                    ("id", json!(rubric.id)),
                    ("criteria", json!(rubric.criteria.len())),
                ],
            )?,
            OutputFormat::Human => {
                if !cli.quiet {
                    println!("{} is valid ({} criteria)", rubric.id, rubric.criteria.len());
                }
            }
            OutputFormat::Records => {
                print_records_header("validate", "status=valid");
                println!("{}", format_rubric_record(&rubric));
            }
        }
        return Ok(());
    }

    if cli.format == OutputFormat::Human && !cli.quiet {
        for error in &errors {
            println!("  - {}", error);
        }
    }
    Err(ValidationError::InvalidRubric { errors }.into())
}

pub fn clone(
    cli: &Cli,
    store: &Store,
    id: &str,
    new_id: &str,
    scope: RubricScope,
    name: Option<&str>,
) -> Result<()> {
    let source = store.db().rubric(id)?;
    let mut copy = source.cloned_as(new_id, scope);
    if let Some(name) = name {
        copy.name = name.to_string();
    }
    store.db().insert_rubric(&copy)?;

    match cli.format {
        OutputFormat::Json => print_json(&copy)?,
        OutputFormat::Human => {
            if !cli.quiet {
                println!("Cloned {} as {} ({})", id, copy.id, copy.scope);
            }
        }
        OutputFormat::Records => {
            print_records_header("rubric", &format!("status=cloned from={}", id));
            println!("{}", format_rubric_record(&copy));
        }
    }
    Ok(())
}
