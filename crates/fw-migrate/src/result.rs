//! Outcome of a reconciliation pass.

use serde::Serialize;
use std::fmt;

/// Result of [`crate::MigrationProcessor::migrate`].
///
/// `last_successful_order` is the order of the newest step recorded as
/// applied, or 0 when nothing has ever been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MigrationResult {
    Success {
        last_successful_order: i64,
    },
    Failure {
        last_successful_order: i64,
        error_message: String,
    },
}

impl MigrationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MigrationResult::Success { .. })
    }

    pub fn last_successful_order(&self) -> i64 {
        match self {
            MigrationResult::Success {
                last_successful_order,
            }
            | MigrationResult::Failure {
                last_successful_order,
                ..
            } => *last_successful_order,
        }
    }

    /// Error text of the failing step, if any
    pub fn error_message(&self) -> Option<&str> {
        match self {
            MigrationResult::Success { .. } => None,
            MigrationResult::Failure { error_message, .. } => Some(error_message),
        }
    }
}

impl fmt::Display for MigrationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationResult::Success {
                last_successful_order,
            } => write!(f, "success (last order {last_successful_order})"),
            MigrationResult::Failure {
                last_successful_order,
                error_message,
            } => write!(
                f,
                "failure after order {last_successful_order}: {error_message}"
            ),
        }
    }
}
