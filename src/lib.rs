//! # Harbormaster
//!
//! Ordered, ledger-tracked PostgreSQL schema migrations on the `may` runtime.
//!
//! Migrations are registered in apply order, applied ones are recorded in a ledger
//! table inside the store, and a [`MigrationRunner`](migration::MigrationRunner)
//! applies what is pending, reverses the most recent one, or reports status.

pub mod config;
pub mod connection;
pub mod executor;
pub mod metrics;
pub mod migration;
pub mod transaction;

#[cfg(test)]
mod test_helpers;

pub use crate::config::Settings;
pub use crate::connection::{connect, redact, validate_connection_string, ConnectionError};
pub use crate::executor::{Executor, PostgresExecutor, StoreError};
pub use crate::transaction::Transaction;
