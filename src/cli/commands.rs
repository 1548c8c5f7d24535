//! Command dispatch

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::HierarchyService;
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{NodeId, SubmittedRow};
use crate::infrastructure::{InfraError, TomlNodeStore};

/// On-disk submission shape: ordered `[[row]]` entries.
#[derive(Debug, Deserialize)]
struct SubmissionFile {
    #[serde(default, rename = "row")]
    rows: Vec<SubmittedRow>,
}

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    let command = match &cli.command {
        Some(command) => command,
        None => return Ok(()),
    };

    let nodes_file = settings
        .resolve_nodes_file(cli.file.as_ref())
        .ok_or_else(|| {
            CliError::Usage("no nodes file given (use --file or set nodes_file in config)".into())
        })?;

    let service = HierarchyService::new(Arc::new(TomlNodeStore::new(&nodes_file)));

    match command {
        Commands::Show => _show(&service, settings),
        Commands::List => _list(&service, settings),
        Commands::Check => _check(&service, settings),
        Commands::Move {
            id,
            parent,
            root,
            weight,
        } => _move(&service, id, parent.as_deref(), *root, *weight),
        Commands::Apply { submission } => _apply(&service, submission),
    }
}

#[instrument(skip(service, settings))]
fn _show(service: &HierarchyService, settings: &Settings) -> CliResult<()> {
    let (arena, issues) = service.forest()?;

    print!("{}", output::render_forest(&arena));
    output::print_issues(&issues, settings.color);
    Ok(())
}

#[instrument(skip(service, settings))]
fn _list(service: &HierarchyService, settings: &Settings) -> CliResult<()> {
    let outline = service.outline()?;

    print!("{}", output::render_list(&outline));
    output::print_issues(&outline.issues, settings.color);
    Ok(())
}

#[instrument(skip(service, settings))]
fn _check(service: &HierarchyService, settings: &Settings) -> CliResult<()> {
    let report = service.check()?;
    output::print_report(&report, settings.color);

    let structural = report
        .issues
        .iter()
        .any(|i| matches!(i, crate::domain::HierarchyIssue::CycleTruncated { .. }));
    if structural || (settings.strict && !report.is_clean()) {
        return Err(CliError::CheckFailed("hierarchy check failed".into()));
    }
    Ok(())
}

#[instrument(skip(service))]
fn _move(
    service: &HierarchyService,
    id: &str,
    parent: Option<&str>,
    root: bool,
    weight: Option<i64>,
) -> CliResult<()> {
    if parent.is_none() && !root {
        return Err(CliError::Usage(
            "move needs either --parent <id> or --root".into(),
        ));
    }

    let new_parent = parent.map(NodeId::from);
    let mutations = service.move_node(&NodeId::from(id), new_parent, weight)?;

    debug!("applied {} mutations", mutations.len());
    println!("moved '{}' ({} nodes updated)", id, mutations.len());
    Ok(())
}

#[instrument(skip(service))]
fn _apply(service: &HierarchyService, submission_path: &Path) -> CliResult<()> {
    let rows = read_submission(submission_path)?;
    if rows.is_empty() {
        return Err(CliError::Usage(format!(
            "submission file has no rows: {}",
            submission_path.display()
        )));
    }

    let mutations = service.reorder(&rows)?;
    println!("order saved ({} nodes updated)", mutations.len());
    Ok(())
}

fn read_submission(path: &Path) -> CliResult<Vec<SubmittedRow>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("reading {}", path.display()), e))?;

    let file: SubmissionFile = toml::from_str(&content).map_err(|e| InfraError::Format {
        path: PathBuf::from(path),
        message: e.message().to_string(),
    })?;

    Ok(file.rows)
}
