//! fw-core - Core library for Forwardly
//!
//! This crate provides the project configuration (`forwardly.yml`) and the
//! core error type shared by the other Forwardly crates.

pub mod config;
pub mod error;

pub use config::{Config, DatabaseConfig, DbType, MigrationsConfig};
pub use error::{CoreError, CoreResult};
