//! Configuration types and parsing for forwardly.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default name of the migration log table
pub const DEFAULT_MIGRATION_TABLE: &str = "migrations";

/// Default directory holding `<order>_<description>.sql` files
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Main project configuration from forwardly.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Migration catalog and log settings
    #[serde(default)]
    pub migrations: MigrationsConfig,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file path or `:memory:`)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// Migration catalog location and log table settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationsConfig {
    /// Directory containing migration SQL files, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub path: String,

    /// Name of the persisted migration log table
    #[serde(default = "default_migration_table")]
    pub table: String,

    /// Skip the check that applied statements still match the catalog.
    ///
    /// Only meant for throwaway validation databases.
    #[serde(default)]
    pub allow_modified_statements: bool,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            path: default_migrations_dir(),
            table: default_migration_table(),
            allow_modified_statements: false,
        }
    }
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_migrations_dir() -> String {
    DEFAULT_MIGRATIONS_DIR.to_string()
}

fn default_migration_table() -> String {
    DEFAULT_MIGRATION_TABLE.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for forwardly.yml or forwardly.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("forwardly.yml");
        let yaml_path = dir.join("forwardly.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if !is_valid_table_name(&self.migrations.table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "Migration table '{}' must be a plain identifier, optionally schema-qualified",
                    self.migrations.table
                ),
            });
        }

        if self.migrations.allow_modified_statements {
            log::warn!(
                "'migrations.allow_modified_statements' is enabled; edited migrations will not be detected"
            );
        }

        Ok(())
    }

    /// Absolute path of the migrations directory relative to a project root
    pub fn migrations_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations.path)
    }

    /// Resolve the database path against a project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    pub fn database_path(&self, root: &Path) -> String {
        let path = &self.database.path;
        if path == ":memory:" || Path::new(path).is_absolute() {
            path.clone()
        } else {
            root.join(path).display().to_string()
        }
    }
}

/// Returns `true` when `name` is `ident` or `schema.ident` with plain SQL
/// identifiers (ASCII letters, digits, underscores, not starting with a digit).
pub fn is_valid_table_name(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() > 2 {
        return false;
    }
    parts.iter().all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
