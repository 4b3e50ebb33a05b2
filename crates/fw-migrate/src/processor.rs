//! Reconciliation of the catalog against the migration log.

use crate::catalog::MigrationCatalog;
use crate::error::{MigrateError, MigrateResult};
use crate::log_store::{LogEntry, LogStore};
use crate::result::MigrationResult;
use crate::status::{build_status, StepStatus};
use crate::step::MigrationStep;
use fw_core::config::{is_valid_table_name, MigrationsConfig};
use fw_db::{Database, DbError};
use std::fmt;

/// Phase of a single reconciliation pass, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassPhase {
    Initializing,
    Reconciling,
    Applying,
    Concluded,
}

impl fmt::Display for PassPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassPhase::Initializing => write!(f, "initializing"),
            PassPhase::Reconciling => write!(f, "reconciling"),
            PassPhase::Applying => write!(f, "applying"),
            PassPhase::Concluded => write!(f, "concluded"),
        }
    }
}

/// Outcome of a single step inside a pass
enum StepOutcome {
    Applied,
    Failed(String),
}

/// Applies a [`MigrationCatalog`] to a database, forward only.
///
/// Holds no state between passes besides its configuration, so the same
/// processor can be run any number of times against the same database.
#[derive(Debug, Clone)]
pub struct MigrationProcessor {
    catalog: MigrationCatalog,
    log: LogStore,
    allow_modified_statements: bool,
}

impl MigrationProcessor {
    /// Processor logging to the default `migrations` table
    pub fn new(catalog: MigrationCatalog) -> Self {
        Self {
            catalog,
            log: LogStore::default(),
            allow_modified_statements: false,
        }
    }

    /// Processor configured from the `migrations` section of forwardly.yml
    pub fn from_config(catalog: MigrationCatalog, config: &MigrationsConfig) -> MigrateResult<Self> {
        Ok(Self::new(catalog)
            .with_table_name(config.table.clone())?
            .allow_modified_statements(config.allow_modified_statements))
    }

    /// Use a different log table.
    ///
    /// The name is spliced into SQL, so it must be `ident` or `schema.ident`.
    pub fn with_table_name(mut self, table: impl Into<String>) -> MigrateResult<Self> {
        let table = table.into();
        if !is_valid_table_name(&table) {
            return Err(MigrateError::InvalidTableName { table });
        }
        self.log = LogStore::new(table);
        Ok(self)
    }

    /// Accept applied steps whose statement no longer matches the catalog.
    ///
    /// Only for throwaway validation databases; production passes must keep
    /// this off.
    pub fn allow_modified_statements(mut self, allow: bool) -> Self {
        self.allow_modified_statements = allow;
        self
    }

    /// Name of the migration log table
    pub fn migration_table_name(&self) -> &str {
        self.log.table()
    }

    pub fn catalog(&self) -> &MigrationCatalog {
        &self.catalog
    }

    /// Create the migration log table if it does not exist.
    pub async fn initialize(&self, db: &dyn Database) -> MigrateResult<()> {
        self.enter(PassPhase::Initializing);
        self.log.ensure_schema(db).await
    }

    /// Run one reconciliation pass.
    ///
    /// Integrity violations in the applied history and log access failures
    /// are returned as errors before or between steps. Each step runs in its
    /// own transaction together with its success entry. A step whose
    /// statement fails is rolled back, recorded and reported as
    /// [`MigrationResult::Failure`]; no later step runs in the same pass.
    pub async fn migrate(&self, db: &dyn Database) -> MigrateResult<MigrationResult> {
        self.enter(PassPhase::Reconciling);
        let entries = self.log.load_entries(db).await?;
        let mut last_successful = self.verify_history(&entries)?;

        let purged = self.log.purge_failed(db).await?;
        if purged > 0 {
            log::debug!(
                "Purged {purged} failed attempt(s) from {}",
                self.log.table()
            );
        }

        let pending = self.catalog.after(last_successful);
        self.warn_unreachable(last_successful, &entries);

        self.enter(PassPhase::Applying);
        for step in pending {
            log::debug!("Applying migration {} ({})", step.order, step.description);
            match self.apply_step(db, step).await? {
                StepOutcome::Applied => last_successful = step.order,
                StepOutcome::Failed(message) => {
                    log::warn!("Migration {} failed: {message}", step.order);
                    self.log.record(db, step, false, &message).await?;
                    self.enter(PassPhase::Concluded);
                    return Ok(MigrationResult::Failure {
                        last_successful_order: last_successful,
                        error_message: message,
                    });
                }
            }
        }

        self.enter(PassPhase::Concluded);
        log::info!(
            "Migrations up to date at order {last_successful} ({} applied this pass)",
            pending.len()
        );
        Ok(MigrationResult::Success {
            last_successful_order: last_successful,
        })
    }

    /// Per-step report of the catalog against the log, without changing
    /// anything. Every step is pending when the log table does not exist.
    pub async fn status(&self, db: &dyn Database) -> MigrateResult<Vec<StepStatus>> {
        let entries = if self.log.exists(db).await? {
            self.log.load_entries(db).await?
        } else {
            Vec::new()
        };
        Ok(build_status(&self.catalog, &entries))
    }

    /// Run `step` and its success entry in one transaction.
    ///
    /// Statement and commit errors roll the step back and come back as
    /// [`StepOutcome::Failed`]; nothing of the step survives. A failure to
    /// write the success entry also rolls back, then aborts the pass.
    async fn apply_step(&self, db: &dyn Database, step: &MigrationStep) -> MigrateResult<StepOutcome> {
        let order = step.order;
        let tx_err = move |source: DbError| MigrateError::Transaction { order, source };

        db.begin().await.map_err(tx_err)?;

        if let Err(err) = db.execute_batch(&step.statement).await {
            db.rollback().await.map_err(tx_err)?;
            return Ok(StepOutcome::Failed(err.driver_message()));
        }
        if let Err(err) = self.log.record(db, step, true, "").await {
            if let Err(rollback_err) = db.rollback().await {
                log::warn!("Rollback of migration {order} failed: {rollback_err}");
            }
            return Err(err);
        }
        if let Err(err) = db.commit().await {
            // A failed commit may already have ended the transaction.
            if let Err(rollback_err) = db.rollback().await {
                log::debug!("Rollback after failed commit of migration {order}: {rollback_err}");
            }
            return Ok(StepOutcome::Failed(err.driver_message()));
        }
        Ok(StepOutcome::Applied)
    }

    /// Check every successful entry against the catalog and return the order
    /// of the newest one.
    fn verify_history(&self, entries: &[LogEntry]) -> MigrateResult<i64> {
        let mut last_successful = 0;
        for entry in entries.iter().filter(|e| e.successful) {
            let Some(step) = self.catalog.get(entry.creation_order) else {
                return Err(MigrateError::MissingStep {
                    order: entry.creation_order,
                    statement: entry.query_executed.clone(),
                    run_timestamp: entry.run_timestamp_display(),
                });
            };
            if step.statement != entry.query_executed {
                if !self.allow_modified_statements {
                    return Err(MigrateError::ModifiedStep {
                        order: entry.creation_order,
                        statement: entry.query_executed.clone(),
                        run_timestamp: entry.run_timestamp_display(),
                    });
                }
                log::warn!(
                    "Migration {} differs from the applied statement; accepted because modified statements are allowed",
                    entry.creation_order
                );
            }
            last_successful = entry.creation_order;
        }
        Ok(last_successful)
    }

    /// Steps declared below the newest applied order but never applied are
    /// skipped forever; say so.
    fn warn_unreachable(&self, last_successful: i64, entries: &[LogEntry]) {
        for step in self.catalog.steps() {
            if step.order >= last_successful {
                break;
            }
            let applied = entries
                .iter()
                .any(|e| e.successful && e.creation_order == step.order);
            if !applied {
                log::warn!(
                    "Migration {} is older than applied migration {last_successful} and will not run",
                    step.order
                );
            }
        }
    }

    fn enter(&self, phase: PassPhase) {
        log::debug!("Migration pass on {}: {phase}", self.log.table());
    }
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod tests;
