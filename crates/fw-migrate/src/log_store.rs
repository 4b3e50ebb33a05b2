//! The persisted migration log.
//!
//! One row per attempted step, keyed by `creation_order`. Successful rows are
//! the durable history of the database; failed rows only live until the next
//! pass purges them.

use crate::error::{MigrateError, MigrateResult};
use crate::step::MigrationStep;
use chrono::{DateTime, Utc};
use fw_core::config::DEFAULT_MIGRATION_TABLE;
use fw_db::{Column, ColumnAction, ColumnType, Database, Row, SqlValue};
use serde::Serialize;

/// Columns of the log table, in storage order.
pub const LOG_COLUMNS: &[Column] = &[
    Column::new("creation_order", ColumnType::Integer),
    Column::new("description", ColumnType::Text),
    Column::new("run_timestamp", ColumnType::Timestamp),
    Column::new("query_executed", ColumnType::Text),
    Column::new("successful", ColumnType::Boolean),
    Column::new("message", ColumnType::Text),
];

const PRIMARY_KEY: &str = "creation_order";

/// A row of the migration log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub creation_order: i64,
    pub description: String,
    pub run_timestamp: Option<DateTime<Utc>>,
    pub query_executed: String,
    pub successful: bool,
    pub message: String,
}

impl LogEntry {
    fn from_row(row: &Row) -> MigrateResult<Self> {
        Ok(Self {
            creation_order: row.get_i64(0)?,
            description: row.get_text(1)?.to_string(),
            run_timestamp: row.get_timestamp(2)?,
            query_executed: row.get_text(3)?.to_string(),
            successful: row.get_bool(4)?,
            message: row.get_text(5)?.to_string(),
        })
    }

    /// Timestamp formatted for error messages
    pub fn run_timestamp_display(&self) -> String {
        match self.run_timestamp {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "an unknown time".to_string(),
        }
    }
}

/// Access to the migration log table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStore {
    table: String,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new(DEFAULT_MIGRATION_TABLE)
    }
}

impl LogStore {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Name of the log table
    pub fn table(&self) -> &str {
        &self.table
    }

    /// `CREATE TABLE IF NOT EXISTS` statement for the log table
    pub fn create_table_sql(&self) -> String {
        let columns: Vec<String> = LOG_COLUMNS
            .iter()
            .map(|column| {
                let constraint = if column.name == PRIMARY_KEY {
                    "PRIMARY KEY"
                } else {
                    "NOT NULL"
                };
                format!(
                    "    {} {} {}",
                    column.name,
                    column.column_type.sql_type(),
                    constraint
                )
            })
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
            self.table,
            columns.join(",\n")
        )
    }

    /// Create the log table (and its schema, if qualified) when missing.
    pub async fn ensure_schema(&self, db: &dyn Database) -> MigrateResult<()> {
        let schema_err = |source| MigrateError::Schema {
            table: self.table.clone(),
            source,
        };

        if let Some((schema, _)) = self.table.split_once('.') {
            db.execute_batch(&format!("CREATE SCHEMA IF NOT EXISTS {schema}"))
                .await
                .map_err(schema_err)?;
        }
        db.execute_batch(&self.create_table_sql())
            .await
            .map_err(schema_err)?;
        Ok(())
    }

    /// Whether the log table exists yet
    pub async fn exists(&self, db: &dyn Database) -> MigrateResult<bool> {
        Ok(db.relation_exists(&self.table).await?)
    }

    /// Every entry, ascending by order
    pub async fn load_entries(&self, db: &dyn Database) -> MigrateResult<Vec<LogEntry>> {
        let source = format!("{} ORDER BY {PRIMARY_KEY}", self.table);
        db.select(LOG_COLUMNS, &source)
            .await?
            .iter()
            .map(LogEntry::from_row)
            .collect()
    }

    /// Delete every failed entry, whatever order it belongs to.
    pub async fn purge_failed(&self, db: &dyn Database) -> MigrateResult<usize> {
        let sql = format!("DELETE FROM {} WHERE successful = false", self.table);
        Ok(db.execute(&sql).await?)
    }

    /// Record the outcome of running `step`; the timestamp is set by the
    /// database.
    pub async fn record(
        &self,
        db: &dyn Database,
        step: &MigrationStep,
        successful: bool,
        message: &str,
    ) -> MigrateResult<()> {
        let row = Row::new(vec![
            SqlValue::Integer(step.order),
            SqlValue::from(step.description.as_str()),
            SqlValue::Null,
            SqlValue::from(step.statement.as_str()),
            SqlValue::Boolean(successful),
            SqlValue::from(message),
        ]);
        db.insert(
            LOG_COLUMNS,
            &self.table,
            &[row],
            &[("run_timestamp", ColumnAction::Now)],
        )
        .await?;
        Ok(())
    }
}
