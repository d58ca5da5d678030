//! SchemaManager - the store handle given to schema operations

use crate::executor::{Executor, StoreError};
use crate::transaction::Transaction;
use may_postgres::types::ToSql;
use sea_query::{
    IndexCreateStatement, IndexDropStatement, PostgresQueryBuilder, TableAlterStatement,
    TableCreateStatement, TableDropStatement,
};

/// SchemaManager wraps an [`Executor`] and offers the statements migrations usually need
///
/// DDL helpers take `sea-query` statements and render them with the PostgreSQL builder.
///
/// # Example
///
/// ```rust,no_run
/// use harbormaster::migration::SchemaManager;
/// use harbormaster::StoreError;
/// use sea_query::{ColumnDef, Table};
///
/// fn create_users(manager: &SchemaManager<'_>) -> Result<(), StoreError> {
///     let table = Table::create()
///         .table("users")
///         .if_not_exists()
///         .col(ColumnDef::new("id").uuid().not_null().primary_key())
///         .col(ColumnDef::new("email").text().not_null().unique_key())
///         .to_owned();
///     manager.create_table(table)
/// }
/// ```
pub struct SchemaManager<'a> {
    executor: &'a dyn Executor,
}

impl<'a> SchemaManager<'a> {
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }

    /// The underlying executor, for queries the helpers do not cover
    pub fn executor(&self) -> &'a dyn Executor {
        self.executor
    }

    /// Execute one raw statement
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the statement fails.
    pub fn execute(&self, sql: &str, params: &[&dyn ToSql]) -> Result<u64, StoreError> {
        self.executor.execute(sql, params)
    }

    /// Execute parameterless statements in order, stopping at the first failure
    ///
    /// # Errors
    ///
    /// Returns the first `StoreError` encountered.
    pub fn execute_batch(&self, statements: &[&str]) -> Result<(), StoreError> {
        for sql in statements {
            self.executor.execute(sql, &[])?;
        }
        Ok(())
    }

    pub fn create_table(&self, table: TableCreateStatement) -> Result<(), StoreError> {
        self.run_ddl(table.build(PostgresQueryBuilder))
    }

    pub fn drop_table(&self, table: TableDropStatement) -> Result<(), StoreError> {
        self.run_ddl(table.build(PostgresQueryBuilder))
    }

    pub fn alter_table(&self, alter: TableAlterStatement) -> Result<(), StoreError> {
        self.run_ddl(alter.build(PostgresQueryBuilder))
    }

    pub fn create_index(&self, index: IndexCreateStatement) -> Result<(), StoreError> {
        self.run_ddl(index.build(PostgresQueryBuilder))
    }

    pub fn drop_index(&self, index: IndexDropStatement) -> Result<(), StoreError> {
        self.run_ddl(index.build(PostgresQueryBuilder))
    }

    /// Run `f` inside a transaction
    ///
    /// `f` receives a manager bound to the open transaction. The transaction commits
    /// when `f` returns `Ok` and rolls back when it returns `Err`; the original error is
    /// returned even if the rollback itself fails. Called on a manager that is already
    /// inside a transaction, this opens a savepoint and leaves the outcome of the
    /// enclosing transaction to its owner.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` from `BEGIN`, from `f`, or from `COMMIT`.
    pub fn transaction<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&SchemaManager<'_>) -> Result<(), StoreError>,
    {
        let tx = Transaction::begin(self.executor)?;
        let result = {
            let scoped = SchemaManager::new(&tx);
            f(&scoped)
        };

        match result {
            Ok(()) => tx.commit(),
            Err(e) => {
                if let Err(rollback_err) = tx.rollback() {
                    log::warn!("Rollback after failed schema change also failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }

    fn run_ddl(&self, sql: String) -> Result<(), StoreError> {
        log::debug!("Executing DDL: {sql}");
        self.executor.execute(&sql, &[]).map(|_| ())
    }
}
