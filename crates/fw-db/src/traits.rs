//! Database trait definition

use crate::error::DbResult;
use crate::row::{Column, ColumnAction, Row};
use async_trait::async_trait;

/// Database abstraction trait for Forwardly
///
/// Each call is a single awaited round trip; callers issue them serially.
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one SQL statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute one or more SQL statements separated by semicolons
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Select the columns of `schema` from `source`.
    ///
    /// `source` is everything after `FROM`, including any `WHERE` and
    /// `ORDER BY` clauses; rows come back in the order it specifies.
    async fn select(&self, schema: &[Column], source: &str) -> DbResult<Vec<Row>>;

    /// Insert `rows` into `table`.
    ///
    /// Each row carries one value per column of `schema`. Columns listed in
    /// `actions` take a server-side value instead and their row value is
    /// ignored.
    async fn insert(
        &self,
        schema: &[Column],
        table: &str,
        rows: &[Row],
        actions: &[(&str, ColumnAction)],
    ) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Open an explicit transaction on this connection
    async fn begin(&self) -> DbResult<()> {
        self.execute_batch("BEGIN TRANSACTION").await
    }

    /// Commit the open transaction
    async fn commit(&self) -> DbResult<()> {
        self.execute_batch("COMMIT").await
    }

    /// Roll back the open transaction
    async fn rollback(&self) -> DbResult<()> {
        self.execute_batch("ROLLBACK").await
    }

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
