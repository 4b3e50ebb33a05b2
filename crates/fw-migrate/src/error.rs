//! Error types for the migration engine.

use fw_db::DbError;
use thiserror::Error;

/// Migration engine errors.
///
/// A failing migration statement is not an error: it is reported through
/// [`crate::MigrationResult::Failure`]. Everything here aborts the pass.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Catalog step with a non-positive order (MG001).
    #[error("[MG001] Invalid migration order {order}: order number must be greater than zero")]
    InvalidOrder { order: i64 },

    /// Catalog step not strictly after its predecessor (MG002).
    #[error("[MG002] Migration order {order} declared after {previous}: orders must grow")]
    OrderRegression { order: i64, previous: i64 },

    /// The migration log table could not be created (MG003).
    #[error("[MG003] Failed to ensure migration log table {table}: {source}")]
    Schema {
        table: String,
        #[source]
        source: DbError,
    },

    /// An applied migration was removed from the catalog (MG004).
    #[error(
        "[MG004] Migration {order} applied at {run_timestamp} not found in your list of migrations. Original query: {statement}"
    )]
    MissingStep {
        order: i64,
        statement: String,
        run_timestamp: String,
    },

    /// An applied migration's statement was edited in the catalog (MG005).
    #[error(
        "[MG005] Migration {order} query text modified since it was applied at {run_timestamp}. Original query: {statement}"
    )]
    ModifiedStep {
        order: i64,
        statement: String,
        run_timestamp: String,
    },

    /// Reading or writing the migration log failed (MG006).
    #[error("[MG006] Migration log access failed: {0}")]
    Log(#[from] DbError),

    /// Catalog files could not be discovered or parsed (MG007).
    #[error("[MG007] Failed to load migrations from {path}: {message}")]
    Discovery { path: String, message: String },

    /// Opening or rolling back the transaction around a step failed (MG008).
    #[error("[MG008] Transaction for migration {order} failed: {source}")]
    Transaction {
        order: i64,
        #[source]
        source: DbError,
    },

    /// Log table name is not a plain, optionally schema-qualified, identifier (MG009).
    #[error("[MG009] Invalid migration table name '{table}'")]
    InvalidTableName { table: String },
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;
