//! Migrate command implementation

use anyhow::{Context, Result};
use fw_migrate::MigrationResult;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{build_processor, load_project, open_database, ExitCode};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let processor = build_processor(&project, args.allow_modified)?;
    let db = open_database(&project, global)?;

    processor
        .initialize(&db)
        .await
        .context("Failed to initialize migration log")?;
    let result = processor
        .migrate(&db)
        .await
        .context("Migration aborted")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    if result.is_success() {
        Ok(())
    } else {
        Err(ExitCode(1).into())
    }
}

fn print_result(result: &MigrationResult) {
    match result {
        MigrationResult::Success {
            last_successful_order,
        } => println!("Migrations complete. Last applied order: {last_successful_order}"),
        MigrationResult::Failure {
            last_successful_order,
            error_message,
        } => {
            eprintln!("Migration failed after order {last_successful_order}");
            eprintln!("  {error_message}");
            eprintln!("Fix the failing migration and run `fw migrate` again.");
        }
    }
}
