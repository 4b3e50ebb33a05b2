//! The ordered, append-only list of migration steps.

use crate::error::{MigrateError, MigrateResult};
use crate::step::MigrationStep;

/// Append-only sequence of [`MigrationStep`]s with strictly increasing orders.
///
/// Every append is validated, so a catalog that exists is always well ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationCatalog {
    steps: Vec<MigrationStep>,
}

impl MigrationCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `step` in place.
    pub fn push(&mut self, step: MigrationStep) -> MigrateResult<()> {
        if step.order <= 0 {
            return Err(MigrateError::InvalidOrder { order: step.order });
        }
        if let Some(previous) = self.last_order() {
            if step.order <= previous {
                return Err(MigrateError::OrderRegression {
                    order: step.order,
                    previous,
                });
            }
        }
        self.steps.push(step);
        Ok(())
    }

    /// Builder form of [`push`](Self::push).
    ///
    /// ```
    /// use fw_migrate::{MigrationCatalog, MigrationStep};
    ///
    /// let catalog = MigrationCatalog::new()
    ///     .with_step(MigrationStep::new(1, "create users", "CREATE TABLE users (id INT)"))?
    ///     .with_step(MigrationStep::new(2, "seed users", "INSERT INTO users VALUES (1)"))?;
    /// assert_eq!(catalog.len(), 2);
    /// # Ok::<(), fw_migrate::MigrateError>(())
    /// ```
    pub fn with_step(mut self, step: MigrationStep) -> MigrateResult<Self> {
        self.push(step)?;
        Ok(self)
    }

    /// Shorthand for `with_step(MigrationStep::new(..))`
    pub fn with(
        self,
        order: i64,
        description: impl Into<String>,
        statement: impl Into<String>,
    ) -> MigrateResult<Self> {
        self.with_step(MigrationStep::new(order, description, statement))
    }

    /// All steps in ascending order
    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    /// Step with exactly this order
    pub fn get(&self, order: i64) -> Option<&MigrationStep> {
        self.steps
            .binary_search_by_key(&order, |s| s.order)
            .ok()
            .map(|idx| &self.steps[idx])
    }

    /// Steps whose order is strictly greater than `order`, ascending
    pub fn after(&self, order: i64) -> &[MigrationStep] {
        let start = self.steps.partition_point(|s| s.order <= order);
        &self.steps[start..]
    }

    /// Order of the most recently appended step
    pub fn last_order(&self) -> Option<i64> {
        self.steps.last().map(|s| s.order)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl TryFrom<Vec<MigrationStep>> for MigrationCatalog {
    type Error = MigrateError;

    fn try_from(steps: Vec<MigrationStep>) -> MigrateResult<Self> {
        let mut catalog = Self::new();
        for step in steps {
            catalog.push(step)?;
        }
        Ok(catalog)
    }
}

impl<'a> IntoIterator for &'a MigrationCatalog {
    type Item = &'a MigrationStep;
    type IntoIter = std::slice::Iter<'a, MigrationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
