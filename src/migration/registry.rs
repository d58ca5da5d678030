//! Migration registry
//!
//! The registry is the ordered catalog of every known migration. Its enumeration order
//! is the apply order; ids are never re-sorted. It is built once per process and is
//! read-only afterwards, so it is passed around by reference instead of living in a
//! global.

use crate::migration::{Migration, MigrationError};
use std::collections::HashSet;

/// Ordered, immutable catalog of migrations
#[derive(Debug)]
pub struct MigrationRegistry {
    migrations: Vec<Migration>,
}

impl MigrationRegistry {
    /// Build a registry, keeping the given order
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::DuplicateMigrationId` naming the first id that appears
    /// twice.
    pub fn new(migrations: Vec<Migration>) -> Result<Self, MigrationError> {
        let mut seen = HashSet::with_capacity(migrations.len());
        for migration in &migrations {
            if !seen.insert(migration.id()) {
                return Err(MigrationError::DuplicateMigrationId {
                    id: migration.id().to_string(),
                });
            }
        }

        log::debug!("Registered {} migration(s)", migrations.len());
        Ok(Self { migrations })
    }

    /// All migrations in apply order
    pub fn list(&self) -> &[Migration] {
        &self.migrations
    }

    /// Look up a migration by id
    pub fn find(&self, id: &str) -> Option<&Migration> {
        self.migrations.iter().find(|m| m.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Ids in apply order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.migrations.iter().map(Migration::id)
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}
