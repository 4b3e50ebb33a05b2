//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use fw_core::Config;
use fw_db::DuckDbBackend;
use fw_migrate::{load_catalog_dir, MigrationCatalog, MigrationProcessor};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only; main.rs exits without printing it.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// A loaded project: its root directory and configuration.
#[derive(Debug, Clone)]
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// Database path after applying the `--database` override.
    pub(crate) fn database_path(&self, global: &GlobalArgs) -> String {
        match &global.database {
            Some(path) => path.clone(),
            None => self.config.database_path(&self.root),
        }
    }

    pub(crate) fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_path_absolute(&self.root)
    }
}

/// Load the project configuration from `--config` or the project directory.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project configuration")?;

    if global.verbose {
        eprintln!("Project: {} ({})", config.name, root.display());
    }
    Ok(Project { root, config })
}

/// Load the migration catalog from the project's migrations directory.
pub(crate) fn load_catalog(project: &Project) -> Result<MigrationCatalog> {
    let dir = project.migrations_dir();
    load_catalog_dir(&dir)
        .with_context(|| format!("Failed to load migrations from {}", dir.display()))
}

/// Build a processor for the project, optionally relaxing the edited-statement check.
pub(crate) fn build_processor(project: &Project, allow_modified: bool) -> Result<MigrationProcessor> {
    let catalog = load_catalog(project)?;
    let processor = MigrationProcessor::from_config(catalog, &project.config.migrations)
        .context("Invalid migrations configuration")?;
    if allow_modified {
        log::warn!("Edited migrations will be accepted for this run");
        return Ok(processor.allow_modified_statements(true));
    }
    Ok(processor)
}

/// Open the project database.
pub(crate) fn open_database(project: &Project, global: &GlobalArgs) -> Result<DuckDbBackend> {
    let path = project.database_path(global);
    if global.verbose {
        eprintln!("Database: {path}");
    }
    if path != ":memory:" {
        if let Some(parent) = Path::new(&path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }
    }
    DuckDbBackend::new(&path).with_context(|| format!("Failed to open database {path}"))
}
