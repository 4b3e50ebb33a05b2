//! Build a catalog from a directory of `<order>_<description>.sql` files.

use crate::catalog::MigrationCatalog;
use crate::error::{MigrateError, MigrateResult};
use crate::step::MigrationStep;
use std::path::Path;

/// Load every `.sql` file in `dir` into a catalog.
///
/// `0003_add_email_to_users.sql` becomes order 3, description
/// `add email to users`. Files are sorted by order before being appended, so
/// two files with the same order fail with an order regression.
pub fn load_catalog_dir(dir: &Path) -> MigrateResult<MigrationCatalog> {
    let discovery_err = |message: String| MigrateError::Discovery {
        path: dir.display().to_string(),
        message,
    };

    let entries = std::fs::read_dir(dir).map_err(|e| discovery_err(e.to_string()))?;

    let mut steps = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| discovery_err(e.to_string()))?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("sql") {
            continue;
        }

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        let Some((order, description)) = parse_file_stem(stem) else {
            return Err(discovery_err(format!(
                "'{}' does not start with a numeric order (expected <order>_<description>.sql)",
                path.display()
            )));
        };

        let statement = std::fs::read_to_string(&path)
            .map_err(|e| discovery_err(format!("{}: {e}", path.display())))?;
        steps.push(MigrationStep::new(order, description, statement.trim()));
    }

    steps.sort_by_key(|s| s.order);
    log::debug!("Discovered {} migration file(s) in {}", steps.len(), dir.display());
    MigrationCatalog::try_from(steps)
}

/// Split `0003_add_email` into `(3, "add email")`.
fn parse_file_stem(stem: &str) -> Option<(i64, String)> {
    let (prefix, rest) = match stem.split_once('_') {
        Some((prefix, rest)) => (prefix, rest),
        None => (stem, ""),
    };
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let order = prefix.parse().ok()?;
    Some((order, rest.replace('_', " ")))
}
