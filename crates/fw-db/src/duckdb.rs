//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::row::{Column, ColumnAction, ColumnType, Row, SqlValue};
use crate::traits::Database;
use async_trait::async_trait;
use chrono::DateTime;
use duckdb::types::ToSql;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        Ok(conn.execute(sql, [])?)
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        Ok(conn.execute_batch(sql)?)
    }

    /// Select typed rows synchronously
    fn select_sync(&self, schema: &[Column], source: &str) -> DbResult<Vec<Row>> {
        let sql = build_select(schema, source);
        log::debug!("duckdb select: {sql}");

        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(schema.len());
                for (idx, column) in schema.iter().enumerate() {
                    values.push(read_value(row, idx, column.column_type)?);
                }
                Ok(Row::new(values))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Insert typed rows synchronously
    fn insert_sync(
        &self,
        schema: &[Column],
        table: &str,
        rows: &[Row],
        actions: &[(&str, ColumnAction)],
    ) -> DbResult<()> {
        let sql = build_insert(schema, table, actions);
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&sql)?;

        for row in rows {
            if row.len() != schema.len() {
                return Err(DbError::SchemaMismatch(format!(
                    "insert into {table} expects {} values, row has {}",
                    schema.len(),
                    row.len()
                )));
            }

            let mut bound: Vec<Box<dyn ToSql>> = Vec::with_capacity(schema.len());
            for (column, value) in schema.iter().zip(row.values()) {
                if action_for(actions, column.name).is_some() {
                    continue;
                }
                if !value.fits(column.column_type) {
                    return Err(DbError::SchemaMismatch(format!(
                        "value {value:?} does not fit column {} ({})",
                        column.name,
                        column.column_type.sql_type()
                    )));
                }
                bound.push(to_sql(value));
            }

            stmt.execute(duckdb::params_from_iter(bound.iter().map(|b| b.as_ref())))?;
        }
        Ok(())
    }

    /// Check if relation exists synchronously
    fn relation_exists_sync(&self, name: &str) -> DbResult<bool> {
        let conn = self.lock()?;

        // Handle schema-qualified names
        let (schema, table) = match name.rfind('.') {
            Some(pos) => (&name[..pos], &name[pos + 1..]),
            None => ("main", name),
        };

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }
}

/// Build `SELECT <columns> FROM <source>`.
///
/// Timestamp columns are read as epoch milliseconds so they decode without
/// depending on driver-side chrono support.
fn build_select(schema: &[Column], source: &str) -> String {
    let exprs: Vec<String> = schema
        .iter()
        .map(|column| match column.column_type {
            ColumnType::Timestamp => format!("epoch_ms({0}) AS {0}", column.name),
            _ => column.name.to_string(),
        })
        .collect();
    format!("SELECT {} FROM {}", exprs.join(", "), source)
}

/// Build a parameterised `INSERT` with server-side values for `actions`.
fn build_insert(schema: &[Column], table: &str, actions: &[(&str, ColumnAction)]) -> String {
    let names: Vec<&str> = schema.iter().map(|c| c.name).collect();
    let values: Vec<&str> = schema
        .iter()
        .map(|column| match action_for(actions, column.name) {
            Some(ColumnAction::Now) => "current_timestamp",
            None => "?",
        })
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        names.join(", "),
        values.join(", ")
    )
}

fn action_for(actions: &[(&str, ColumnAction)], column: &str) -> Option<ColumnAction> {
    actions
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, action)| *action)
}

fn read_value(row: &duckdb::Row<'_>, idx: usize, column_type: ColumnType) -> duckdb::Result<SqlValue> {
    let value = match column_type {
        ColumnType::Integer => row.get::<_, Option<i64>>(idx)?.map(SqlValue::Integer),
        ColumnType::Text => row.get::<_, Option<String>>(idx)?.map(SqlValue::Text),
        ColumnType::Boolean => row.get::<_, Option<bool>>(idx)?.map(SqlValue::Boolean),
        ColumnType::Timestamp => row
            .get::<_, Option<i64>>(idx)?
            .and_then(DateTime::from_timestamp_millis)
            .map(SqlValue::Timestamp),
    };
    Ok(value.unwrap_or(SqlValue::Null))
}

fn to_sql(value: &SqlValue) -> Box<dyn ToSql> {
    match value {
        SqlValue::Null => Box::new(None::<String>),
        SqlValue::Integer(n) => Box::new(*n),
        SqlValue::Text(s) => Box::new(s.clone()),
        SqlValue::Boolean(b) => Box::new(*b),
        SqlValue::Timestamp(ts) => Box::new(ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()),
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn select(&self, schema: &[Column], source: &str) -> DbResult<Vec<Row>> {
        self.select_sync(schema, source)
    }

    async fn insert(
        &self,
        schema: &[Column],
        table: &str,
        rows: &[Row],
        actions: &[(&str, ColumnAction)],
    ) -> DbResult<()> {
        self.insert_sync(schema, table, rows, actions)
    }

    async fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.relation_exists_sync(name)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
