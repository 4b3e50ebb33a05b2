//! Init command implementation

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::commands::common::{build_processor, load_project, open_database};

/// Execute the init command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let processor = build_processor(&project, false)?;
    let db = open_database(&project, global)?;

    processor
        .initialize(&db)
        .await
        .context("Failed to initialize migration log")?;

    println!(
        "Migration log table '{}' is ready",
        processor.migration_table_name()
    );
    Ok(())
}
