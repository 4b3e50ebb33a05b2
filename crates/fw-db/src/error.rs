//! Error types for fw-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Table not found (D003)
    #[error("[D003] Table or view not found: {0}")]
    TableNotFound(String),

    /// Row does not match the declared row schema (D004)
    #[error("[D004] Row does not match schema: {0}")]
    SchemaMismatch(String),

    /// Column value has a different type than requested (D005)
    #[error("[D005] Column {column} is {found}, expected {expected}")]
    TypeMismatch {
        column: usize,
        expected: &'static str,
        found: &'static str,
    },

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    /// The driver's own error text, without the Forwardly error code prefix.
    ///
    /// This is what gets recorded in the migration log when a step fails.
    pub fn driver_message(&self) -> String {
        match self {
            DbError::ConnectionError(msg)
            | DbError::ExecutionError(msg)
            | DbError::TableNotFound(msg)
            | DbError::SchemaMismatch(msg)
            | DbError::MutexPoisoned(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured variants, so the message
        // is the only thing to classify on.
        let msg = err.to_string();
        if msg.contains("Table with name")
            || msg.contains("View with name")
            || msg.contains("Table or view with name")
            || (msg.contains("Catalog Error") && msg.contains("Table") && msg.contains("not found"))
        {
            DbError::TableNotFound(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
