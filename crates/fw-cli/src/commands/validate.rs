//! Validate command implementation

use anyhow::Result;

use crate::cli::GlobalArgs;
use crate::commands::common::{load_catalog, load_project};

/// Execute the validate command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let catalog = load_catalog(&project)?;

    if global.verbose {
        for step in &catalog {
            println!("  {:>5}  {}", step.order, step.description);
        }
    }

    match catalog.last_order() {
        Some(last) => println!(
            "{} migration{} valid, latest order {last}",
            catalog.len(),
            if catalog.len() == 1 { "" } else { "s" }
        ),
        None => println!("No migrations found in {}", project.migrations_dir().display()),
    }
    Ok(())
}
