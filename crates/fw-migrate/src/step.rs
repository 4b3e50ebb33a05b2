//! A single migration step.

use serde::Serialize;

/// One forward-only unit of schema change.
///
/// Once a step has been applied, its `order` and `statement` are part of the
/// database's history and must never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStep {
    /// Position in the catalog, strictly increasing
    pub order: i64,
    /// Free text for the audit log
    pub description: String,
    /// Statement executed verbatim against the target database
    pub statement: String,
}

impl MigrationStep {
    pub fn new(order: i64, description: impl Into<String>, statement: impl Into<String>) -> Self {
        Self {
            order,
            description: description.into(),
            statement: statement.into(),
        }
    }
}
