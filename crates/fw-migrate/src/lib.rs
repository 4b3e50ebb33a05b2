//! Forward-only schema migration engine.
//!
//! A [`MigrationCatalog`] declares ordered, immutable [`MigrationStep`]s. The
//! [`MigrationProcessor`] reconciles it against the persisted migration log,
//! refuses to continue when applied history no longer matches the catalog,
//! and applies the remaining steps one at a time, stopping at the first
//! failure.

pub mod catalog;
pub mod discovery;
pub mod error;
pub mod log_store;
pub mod processor;
pub mod result;
pub mod status;
pub mod step;

pub use catalog::MigrationCatalog;
pub use discovery::load_catalog_dir;
pub use error::{MigrateError, MigrateResult};
pub use log_store::{LogEntry, LogStore};
pub use processor::{MigrationProcessor, PassPhase};
pub use result::MigrationResult;
pub use status::{StepState, StepStatus};
pub use step::MigrationStep;
