//! Schema operations
//!
//! A [`SchemaOperation`] is the only thing the runner knows about what a migration
//! does: "apply this change through the given store handle, report success or
//! failure". The stock operations below cover raw SQL, batches, arbitrary Rust code,
//! transactional wrapping and irreversible changes. New kinds plug in by implementing
//! the trait; the runner does not change.

use crate::executor::StoreError;
use crate::migration::SchemaManager;
use std::borrow::Cow;

/// A pass/fail unit of work against the store
pub trait SchemaOperation: Send + Sync {
    /// Apply the change
    ///
    /// # Errors
    ///
    /// Any `StoreError`; the runner treats every error as a failed migration step.
    fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), StoreError>;
}

impl<O: SchemaOperation + ?Sized> SchemaOperation for Box<O> {
    fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), StoreError> {
        (**self).apply(manager)
    }
}

/// A single SQL statement
#[derive(Debug, Clone)]
pub struct Sql(Cow<'static, str>);

impl Sql {
    pub fn new(statement: impl Into<Cow<'static, str>>) -> Self {
        Self(statement.into())
    }

    pub fn statement(&self) -> &str {
        &self.0
    }
}

impl SchemaOperation for Sql {
    fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), StoreError> {
        manager.execute(&self.0, &[]).map(|_| ())
    }
}

/// Several SQL statements run in order; stops at the first failure
#[derive(Debug, Clone, Default)]
pub struct SqlBatch(Vec<Cow<'static, str>>);

impl SqlBatch {
    pub fn new<I, S>(statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self(statements.into_iter().map(Into::into).collect())
    }

    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(AsRef::as_ref)
    }
}

impl SchemaOperation for SqlBatch {
    fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), StoreError> {
        for statement in &self.0 {
            manager.execute(statement, &[])?;
        }
        Ok(())
    }
}

/// Arbitrary Rust code as an operation; see [`operation`]
pub struct FnOperation<F>(F);

impl<F> SchemaOperation for FnOperation<F>
where
    F: Fn(&SchemaManager<'_>) -> Result<(), StoreError> + Send + Sync,
{
    fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), StoreError> {
        (self.0)(manager)
    }
}

/// Wrap a closure as a [`SchemaOperation`]
///
/// ```rust
/// use harbormaster::migration::{operation, SchemaManager};
///
/// let seed = operation(|manager: &SchemaManager<'_>| {
///     manager.execute("INSERT INTO revenue (month, revenue) VALUES ('Jan', 2000)", &[])?;
///     Ok(())
/// });
/// # let _ = seed;
/// ```
pub fn operation<F>(f: F) -> FnOperation<F>
where
    F: Fn(&SchemaManager<'_>) -> Result<(), StoreError> + Send + Sync,
{
    FnOperation(f)
}

/// Runs the inner operation inside a store transaction
///
/// Commits when the inner operation succeeds and rolls back when it fails, so a
/// multi-step change either lands completely or not at all. Transactions opened inside
/// the inner operation become savepoints of this one.
#[derive(Debug, Clone)]
pub struct Transactional<O>(O);

impl<O: SchemaOperation> SchemaOperation for Transactional<O> {
    fn apply(&self, manager: &SchemaManager<'_>) -> Result<(), StoreError> {
        manager.transaction(|tx| self.0.apply(tx))
    }
}

/// Wrap an operation in [`Transactional`]
pub fn transactional<O: SchemaOperation>(inner: O) -> Transactional<O> {
    Transactional(inner)
}

/// A `down` for migrations that cannot be reversed; always fails
#[derive(Debug, Clone)]
pub struct Irreversible(Cow<'static, str>);

impl Irreversible {
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self(reason.into())
    }
}

impl SchemaOperation for Irreversible {
    fn apply(&self, _manager: &SchemaManager<'_>) -> Result<(), StoreError> {
        Err(StoreError::Other(format!("migration cannot be reversed: {}", self.0)))
    }
}
