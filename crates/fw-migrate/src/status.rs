//! Per-step view of the catalog against the migration log.

use crate::catalog::MigrationCatalog;
use crate::log_store::LogEntry;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Where a step stands in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StepState {
    /// Recorded as successfully applied
    Applied { at: Option<DateTime<Utc>> },
    /// Last attempt failed; will be retried on the next pass
    Failed {
        at: Option<DateTime<Utc>>,
        message: String,
    },
    /// Not attempted yet
    Pending,
    /// Applied, but no longer declared in the catalog
    Missing,
    /// Applied with a statement that differs from the catalog
    Modified,
}

/// One line of a status report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepStatus {
    pub order: i64,
    pub description: String,
    #[serde(flatten)]
    pub state: StepState,
}

/// Merge catalog steps and log entries into an ascending status report.
pub fn build_status(catalog: &MigrationCatalog, entries: &[LogEntry]) -> Vec<StepStatus> {
    let mut report: BTreeMap<i64, StepStatus> = catalog
        .steps()
        .iter()
        .map(|step| {
            (
                step.order,
                StepStatus {
                    order: step.order,
                    description: step.description.clone(),
                    state: StepState::Pending,
                },
            )
        })
        .collect();

    for entry in entries {
        let state = match (catalog.get(entry.creation_order), entry.successful) {
            (None, true) => StepState::Missing,
            (None, false) => continue,
            (Some(step), true) if step.statement != entry.query_executed => StepState::Modified,
            (Some(_), true) => StepState::Applied {
                at: entry.run_timestamp,
            },
            (Some(_), false) => StepState::Failed {
                at: entry.run_timestamp,
                message: entry.message.clone(),
            },
        };
        report.insert(
            entry.creation_order,
            StepStatus {
                order: entry.creation_order,
                description: entry.description.clone(),
                state,
            },
        );
    }

    report.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(order: i64, query: &str, successful: bool) -> LogEntry {
        LogEntry {
            creation_order: order,
            description: format!("step {order}"),
            run_timestamp: None,
            query_executed: query.to_string(),
            successful,
            message: if successful { String::new() } else { "err".to_string() },
        }
    }

    #[test]
    fn test_build_status() {
        let catalog = MigrationCatalog::new()
            .with(1, "a", "SELECT 1")
            .unwrap()
            .with(2, "b", "SELECT 2")
            .unwrap()
            .with(3, "c", "SELECT 3")
            .unwrap()
            .with(4, "d", "SELECT 4")
            .unwrap();
        let entries = vec![
            entry(0, "SELECT 0", true),
            entry(1, "SELECT 1", true),
            entry(2, "SELECT 2 -- edited", true),
            entry(3, "SELECT 3", false),
            entry(9, "SELECT 9", false),
        ];

        let report = build_status(&catalog, &entries);
        let states: Vec<(i64, &StepState)> = report.iter().map(|s| (s.order, &s.state)).collect();
        assert_eq!(
            states,
            vec![
                (0, &StepState::Missing),
                (1, &StepState::Applied { at: None }),
                (2, &StepState::Modified),
                (
                    3,
                    &StepState::Failed {
                        at: None,
                        message: "err".to_string()
                    }
                ),
                (4, &StepState::Pending),
            ]
        );
    }
}
