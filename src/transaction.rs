//! Store transactions
//!
//! A [`Transaction`] borrows an [`Executor`], issues `BEGIN`, and forwards every
//! statement to it until `commit()` or `rollback()` closes it. Dropping an open
//! transaction rolls it back. Transactions opened inside another become savepoints.
//!
//! Schema operations that must be atomic wrap their steps in one of these (see
//! [`Transactional`](crate::migration::Transactional)); the runner itself never opens
//! a transaction.

use crate::executor::{Executor, StoreError};
use may_postgres::types::ToSql;
use may_postgres::Row;

#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// An open transaction on a borrowed executor
///
/// Opening a transaction on an executor that is itself a `Transaction` starts a
/// savepoint instead of a second `BEGIN`, so the inner `commit()` only releases the
/// savepoint and the outer transaction still decides the outcome.
pub struct Transaction<'a> {
    executor: &'a dyn Executor,
    depth: usize,
    closed: bool,
}

impl<'a> Transaction<'a> {
    /// Start a transaction, or a savepoint when `executor` is already inside one
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if `BEGIN` or `SAVEPOINT` fails.
    pub fn begin(executor: &'a dyn Executor) -> Result<Self, StoreError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::transaction_span("begin").entered();

        let depth = executor.transaction_depth();
        if depth == 0 {
            executor.execute("BEGIN", &[])?;
        } else {
            executor.execute(&format!("SAVEPOINT sp_{depth}"), &[])?;
        }

        Ok(Self {
            executor,
            depth,
            closed: false,
        })
    }

    /// Commit the transaction, or release the savepoint when nested
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the statement fails. The transaction counts as closed either way.
    pub fn commit(mut self) -> Result<(), StoreError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::transaction_span("commit").entered();

        self.closed = true;
        let sql = if self.depth == 0 {
            "COMMIT".to_string()
        } else {
            format!("RELEASE SAVEPOINT sp_{}", self.depth)
        };
        self.executor.execute(&sql, &[]).map(|_| ())
    }

    /// Roll the transaction back, or back to the savepoint when nested
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the statement fails.
    pub fn rollback(mut self) -> Result<(), StoreError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::transaction_span("rollback").entered();

        self.closed = true;
        self.executor.execute(&self.rollback_sql(), &[]).map(|_| ())
    }

    /// Check if the transaction is closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Nesting level; `0` for a top-level transaction
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn rollback_sql(&self) -> String {
        if self.depth == 0 {
            "ROLLBACK".to_string()
        } else {
            format!("ROLLBACK TO SAVEPOINT sp_{}", self.depth)
        }
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Other("Transaction is closed".to_string()));
        }
        Ok(())
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.executor.execute(&self.rollback_sql(), &[]) {
                log::warn!("Failed to roll back abandoned transaction: {e}");
            }
        }
    }
}

impl Executor for Transaction<'_> {
    fn execute(&self, query: &str, params: &[&dyn ToSql]) -> Result<u64, StoreError> {
        self.ensure_open()?;
        self.executor.execute(query, params)
    }

    fn query_one(&self, query: &str, params: &[&dyn ToSql]) -> Result<Row, StoreError> {
        self.ensure_open()?;
        self.executor.query_one(query, params)
    }

    fn query_all(&self, query: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>, StoreError> {
        self.ensure_open()?;
        self.executor.query_all(query, params)
    }

    fn transaction_depth(&self) -> usize {
        self.depth + 1
    }
}
