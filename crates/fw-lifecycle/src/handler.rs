//! Lifecycle event handling.

use crate::error::{LifecycleError, LifecycleResult};
use crate::event::{LifecycleEvent, RequestType};
use crate::response::{LifecycleResponse, ResponseData};
use futures::FutureExt;
use fw_db::Database;
use fw_migrate::{MigrationProcessor, MigrationResult};
use std::panic::AssertUnwindSafe;

/// Runs one migration pass per lifecycle event
#[derive(Debug, Clone)]
pub struct LifecycleHandler {
    processor: MigrationProcessor,
}

impl LifecycleHandler {
    pub fn new(processor: MigrationProcessor) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &MigrationProcessor {
        &self.processor
    }

    /// Identifier of the unit of work: the one the deployment system already
    /// knows, or a fresh one for a first create.
    pub fn physical_resource_id(&self, event: &LifecycleEvent) -> String {
        event.physical_resource_id_or_new(self.processor.migration_table_name())
    }

    /// Handle `event` against `db`. Never fails: every error, including a
    /// panic inside the pass, becomes a `FAILED` response.
    pub async fn handle(&self, event: &LifecycleEvent, db: &dyn Database) -> LifecycleResponse {
        let physical_id = self.physical_resource_id(event);
        log::info!(
            "{:?} event {} for {} ({physical_id})",
            event.request_type,
            event.request_id,
            event.logical_resource_id
        );

        let outcome = AssertUnwindSafe(self.run(event, db))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(LifecycleError::Panicked(panic_message(panic))));

        match outcome {
            Ok(None) => LifecycleResponse::success(event, physical_id, self.data(None)),
            Ok(Some(MigrationResult::Success {
                last_successful_order,
            })) => LifecycleResponse::success(
                event,
                physical_id,
                self.data(Some(last_successful_order)),
            ),
            Ok(Some(MigrationResult::Failure {
                last_successful_order,
                error_message,
            })) => LifecycleResponse::failed(
                event,
                physical_id,
                error_message,
                self.data(Some(last_successful_order)),
            ),
            Err(err) => {
                log::warn!("Lifecycle event {} failed: {err}", event.request_id);
                self.failure(event, physical_id, err.to_string())
            }
        }
    }

    /// `FAILED` response for errors raised outside the pass itself, such as
    /// being unable to connect to the database.
    pub fn failure(
        &self,
        event: &LifecycleEvent,
        physical_resource_id: String,
        reason: String,
    ) -> LifecycleResponse {
        LifecycleResponse::failed(event, physical_resource_id, reason, self.data(None))
    }

    async fn run(
        &self,
        event: &LifecycleEvent,
        db: &dyn Database,
    ) -> LifecycleResult<Option<MigrationResult>> {
        match event.request_type {
            // Forward only: nothing is undone when the resource goes away.
            RequestType::Delete => Ok(None),
            RequestType::Create => {
                self.processor.initialize(db).await?;
                Ok(Some(self.processor.migrate(db).await?))
            }
            RequestType::Update => Ok(Some(self.processor.migrate(db).await?)),
        }
    }

    fn data(&self, last_successful_order: Option<i64>) -> ResponseData {
        ResponseData {
            last_successful_order,
            migration_table: self.processor.migration_table_name().to_string(),
        }
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "handler_test.rs"]
mod tests;
