//! Migration descriptor

use crate::executor::StoreError;
use crate::migration::{SchemaManager, SchemaOperation};
use serde::Serialize;
use std::fmt;

/// Which half of a migration runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Forward (`up`)
    Up,
    /// Reverse (`down`)
    Down,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, reversible unit of schema change
///
/// Migrations are built once at process start and handed to a
/// [`MigrationRegistry`](crate::migration::MigrationRegistry); nothing mutates them
/// afterwards.
///
/// # Example
///
/// ```rust
/// use harbormaster::migration::{Migration, Sql};
///
/// let migration = Migration::new(
///     "001",
///     "create users",
///     Sql::new("CREATE TABLE users (id UUID PRIMARY KEY, email TEXT NOT NULL UNIQUE)"),
///     Sql::new("DROP TABLE users"),
/// );
/// assert_eq!(migration.id(), "001");
/// ```
pub struct Migration {
    id: String,
    name: String,
    up: Box<dyn SchemaOperation>,
    down: Box<dyn SchemaOperation>,
}

impl Migration {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        up: impl SchemaOperation + 'static,
        down: impl SchemaOperation + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            up: Box::new(up),
            down: Box::new(down),
        }
    }

    /// Unique id; sorts in intended apply order by convention
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Human-readable label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The operation for `direction`
    pub fn operation(&self, direction: Direction) -> &dyn SchemaOperation {
        match direction {
            Direction::Up => self.up.as_ref(),
            Direction::Down => self.down.as_ref(),
        }
    }

    /// Run one half of the migration against the store
    ///
    /// # Errors
    ///
    /// Returns whatever the operation reports.
    pub fn run(&self, direction: Direction, manager: &SchemaManager<'_>) -> Result<(), StoreError> {
        #[cfg(feature = "tracing")]
        let _span = crate::metrics::tracing_helpers::migration_span(&self.id, direction.as_str()).entered();

        self.operation(direction).apply(manager)
    }
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
