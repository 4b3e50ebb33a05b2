//! Status command implementation

use anyhow::{Context, Result};
use fw_migrate::{StepState, StepStatus};

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{build_processor, load_project, open_database};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let processor = build_processor(&project, false)?;
    let db = open_database(&project, global)?;

    let report = processor
        .status(&db)
        .await
        .context("Failed to read migration log")?;

    match args.output {
        StatusOutput::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        StatusOutput::Table => print_table(&report),
    }
    Ok(())
}

fn print_table(report: &[StepStatus]) {
    if report.is_empty() {
        println!("No migrations declared or recorded.");
        return;
    }

    let width = report
        .iter()
        .map(|s| s.description.len())
        .max()
        .unwrap_or(0)
        .max("DESCRIPTION".len());

    println!("{:>6}  {:<width$}  STATE", "ORDER", "DESCRIPTION");
    for status in report {
        println!(
            "{:>6}  {:<width$}  {}",
            status.order,
            status.description,
            state_label(&status.state)
        );
    }
}

fn state_label(state: &StepState) -> String {
    match state {
        StepState::Applied { at: Some(at) } => format!("applied {}", at.format("%Y-%m-%d %H:%M:%S")),
        StepState::Applied { at: None } => "applied".to_string(),
        StepState::Failed { message, .. } => format!("failed: {message}"),
        StepState::Pending => "pending".to_string(),
        StepState::Missing => "MISSING from catalog".to_string(),
        StepState::Modified => "MODIFIED since applied".to_string(),
    }
}
