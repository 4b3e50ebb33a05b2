//! Typed row model shared by `Database::select` and `Database::insert`.

use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use std::fmt;

/// Logical column type understood by every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit signed integer
    Integer,
    /// Variable-length text
    Text,
    /// Boolean flag
    Boolean,
    /// Timestamp in UTC
    Timestamp,
}

impl ColumnType {
    /// SQL type name used in generated DDL
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Integer => "BIGINT",
            ColumnType::Text => "VARCHAR",
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Timestamp => "TIMESTAMP",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Timestamp => "timestamp",
        }
    }
}

/// One column of a row schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name as it appears in the table
    pub name: &'static str,
    /// Logical type
    pub column_type: ColumnType,
}

impl Column {
    /// Create a column definition
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self { name, column_type }
    }
}

/// Server-side value substituted for a column on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAction {
    /// The database's current timestamp at insert time
    Now,
}

/// A single typed value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Text(String),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    fn label(&self) -> &'static str {
        match self {
            SqlValue::Null => "null",
            SqlValue::Integer(_) => "integer",
            SqlValue::Text(_) => "text",
            SqlValue::Boolean(_) => "boolean",
            SqlValue::Timestamp(_) => "timestamp",
        }
    }

    /// Whether this value may be stored in a column of `column_type`
    pub fn fits(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (SqlValue::Null, _)
                | (SqlValue::Integer(_), ColumnType::Integer)
                | (SqlValue::Text(_), ColumnType::Text)
                | (SqlValue::Boolean(_), ColumnType::Boolean)
                | (SqlValue::Timestamp(_), ColumnType::Timestamp)
        )
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "null"),
            SqlValue::Integer(n) => write!(f, "{n}"),
            SqlValue::Text(s) => write!(f, "{s}"),
            SqlValue::Boolean(b) => write!(f, "{b}"),
            SqlValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.3f")),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Boolean(value)
    }
}

/// A row read from, or written to, a table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    /// Wrap values in schema order
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All values in schema order
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Raw value at `idx`
    pub fn get(&self, idx: usize) -> Option<&SqlValue> {
        self.values.get(idx)
    }

    fn value(&self, idx: usize) -> DbResult<&SqlValue> {
        self.values.get(idx).ok_or_else(|| {
            DbError::SchemaMismatch(format!(
                "column {idx} out of range for row of {} values",
                self.values.len()
            ))
        })
    }

    fn mismatch(idx: usize, expected: ColumnType, found: &SqlValue) -> DbError {
        DbError::TypeMismatch {
            column: idx,
            expected: expected.label(),
            found: found.label(),
        }
    }

    /// Integer value at `idx`
    pub fn get_i64(&self, idx: usize) -> DbResult<i64> {
        match self.value(idx)? {
            SqlValue::Integer(n) => Ok(*n),
            other => Err(Self::mismatch(idx, ColumnType::Integer, other)),
        }
    }

    /// Text value at `idx`; NULL reads as the empty string
    pub fn get_text(&self, idx: usize) -> DbResult<&str> {
        match self.value(idx)? {
            SqlValue::Text(s) => Ok(s),
            SqlValue::Null => Ok(""),
            other => Err(Self::mismatch(idx, ColumnType::Text, other)),
        }
    }

    /// Boolean value at `idx`
    pub fn get_bool(&self, idx: usize) -> DbResult<bool> {
        match self.value(idx)? {
            SqlValue::Boolean(b) => Ok(*b),
            other => Err(Self::mismatch(idx, ColumnType::Boolean, other)),
        }
    }

    /// Timestamp value at `idx`, `None` when NULL
    pub fn get_timestamp(&self, idx: usize) -> DbResult<Option<DateTime<Utc>>> {
        match self.value(idx)? {
            SqlValue::Timestamp(ts) => Ok(Some(*ts)),
            SqlValue::Null => Ok(None),
            other => Err(Self::mismatch(idx, ColumnType::Timestamp, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let row = Row::new(vec![
            SqlValue::Integer(7),
            SqlValue::from("create table t"),
            SqlValue::Boolean(true),
            SqlValue::Null,
        ]);
        assert_eq!(row.get_i64(0).unwrap(), 7);
        assert_eq!(row.get_text(1).unwrap(), "create table t");
        assert!(row.get_bool(2).unwrap());
        assert_eq!(row.get_timestamp(3).unwrap(), None);
        assert_eq!(row.get_text(3).unwrap(), "");
    }

    #[test]
    fn test_type_mismatch() {
        let row = Row::new(vec![SqlValue::from("x")]);
        let err = row.get_i64(0).unwrap_err();
        assert!(matches!(
            err,
            DbError::TypeMismatch {
                column: 0,
                expected: "integer",
                found: "text"
            }
        ));
    }

    #[test]
    fn test_out_of_range() {
        let row = Row::default();
        assert!(matches!(row.get_bool(2), Err(DbError::SchemaMismatch(_))));
    }

    #[test]
    fn test_fits() {
        assert!(SqlValue::Null.fits(ColumnType::Boolean));
        assert!(SqlValue::Integer(1).fits(ColumnType::Integer));
        assert!(!SqlValue::Integer(1).fits(ColumnType::Text));
    }
}
