//! Lifecycle command implementation
//!
//! Reads one deployment lifecycle event, runs it through the adapter and
//! prints the response JSON. Every failure after the event has been read is
//! reported inside the response, never as a process error.

use anyhow::{Context, Result};
use fw_core::config::DEFAULT_MIGRATION_TABLE;
use fw_lifecycle::{LifecycleEvent, LifecycleHandler, LifecycleResponse, ResponseData};
use tokio::io::AsyncReadExt;

use crate::cli::{GlobalArgs, LifecycleArgs};
use crate::commands::common::{build_processor, load_project, open_database};

/// Execute the lifecycle command
pub async fn execute(args: &LifecycleArgs, global: &GlobalArgs) -> Result<()> {
    let payload = read_event(args).await?;
    let event = LifecycleEvent::from_json(&payload)?;

    let response = respond(&event, global).await;
    println!("{}", response.to_json()?);
    Ok(())
}

async fn respond(event: &LifecycleEvent, global: &GlobalArgs) -> LifecycleResponse {
    let project = match load_project(global) {
        Ok(project) => project,
        Err(err) => return setup_failure(event, DEFAULT_MIGRATION_TABLE, err),
    };
    let table = project.config.migrations.table.as_str();

    let handler = match build_processor(&project, false) {
        Ok(processor) => LifecycleHandler::new(processor),
        Err(err) => return setup_failure(event, table, err),
    };
    let db = match open_database(&project, global) {
        Ok(db) => db,
        Err(err) => return setup_failure(event, table, err),
    };
    handler.handle(event, &db).await
}

/// `FAILED` response for errors raised before a migration pass could start.
fn setup_failure(event: &LifecycleEvent, table: &str, err: anyhow::Error) -> LifecycleResponse {
    log::warn!("Lifecycle event {} failed before migrating: {err:#}", event.request_id);
    LifecycleResponse::failed(
        event,
        event.physical_resource_id_or_new(table),
        format!("{err:#}"),
        ResponseData {
            last_successful_order: None,
            migration_table: table.to_string(),
        },
    )
}

async fn read_event(args: &LifecycleArgs) -> Result<String> {
    match &args.event {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {path}")),
        None => {
            let mut payload = String::new();
            tokio::io::stdin()
                .read_to_string(&mut payload)
                .await
                .context("Failed to read event from stdin")?;
            Ok(payload)
        }
    }
}
