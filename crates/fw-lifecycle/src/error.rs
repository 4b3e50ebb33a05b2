//! Error types for fw-lifecycle

use fw_migrate::MigrateError;
use thiserror::Error;

/// Lifecycle adapter errors
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The migration pass aborted (LC001)
    #[error("[LC001] Migration pass failed: {0}")]
    Migration(#[from] MigrateError),

    /// The migration pass panicked (LC002)
    #[error("[LC002] Migration pass panicked: {0}")]
    Panicked(String),

    /// Event payload could not be parsed (LC003)
    #[error("[LC003] Invalid lifecycle event: {0}")]
    InvalidEvent(String),
}

/// Result type alias for LifecycleError
pub type LifecycleResult<T> = Result<T, LifecycleError>;
