//! fw-db - Database abstraction layer for Forwardly
//!
//! This crate provides the `Database` trait consumed by the migration engine,
//! the typed row model it reads and writes, and a DuckDB implementation.

pub mod duckdb;
pub mod error;
pub mod row;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use row::{Column, ColumnAction, ColumnType, Row, SqlValue};
pub use traits::Database;
