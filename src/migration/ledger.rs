//! Migration ledger
//!
//! The ledger is the durable record of which migration ids are applied and when. It
//! lives in the store itself, in a table created lazily with `CREATE TABLE IF NOT
//! EXISTS`:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS migrations_ledger (
//!     id VARCHAR(255) PRIMARY KEY,
//!     name VARCHAR(255) NOT NULL,
//!     applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
//! )
//! ```
//!
//! The table is never dropped by this crate.

use crate::executor::Executor;
use crate::migration::record::LedgerEntry;
use crate::migration::MigrationError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default ledger table name
pub const DEFAULT_LEDGER_TABLE: &str = "migrations_ledger";

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]{0,62}\.)?[A-Za-z_][A-Za-z0-9_]{0,62}$")
        .unwrap_or_else(|e| unreachable!("ledger table pattern is valid: {e}"))
});

/// Durable bookkeeping of applied migrations
///
/// All methods take `&self`; implementations that hold state use interior
/// mutability. The runner only ever talks to the ledger through this trait.
pub trait Ledger {
    /// Create the ledger storage if it is absent; safe to call repeatedly
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::LedgerBootstrap` if the store is unreachable or refuses.
    fn ensure_ready(&self) -> Result<(), MigrationError>;

    /// Every entry, oldest `applied_at` first
    ///
    /// Calls [`ensure_ready`](Ledger::ensure_ready) first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerBootstrap` or `Ledger` errors from the store.
    fn entries(&self) -> Result<Vec<LedgerEntry>, MigrationError>;

    /// Applied ids in chronological order
    ///
    /// # Errors
    ///
    /// Same as [`entries`](Ledger::entries).
    fn applied_ids(&self) -> Result<Vec<String>, MigrationError> {
        Ok(self.entries()?.into_iter().map(|entry| entry.id).collect())
    }

    /// Record `id` as applied now
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::DuplicateLedgerKey` if `id` is already recorded.
    fn record_applied(&self, id: &str, name: &str) -> Result<LedgerEntry, MigrationError>;

    /// Forget `id`; returns whether a row was removed
    ///
    /// Removing an id that is not recorded is not an error and returns `false`.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Ledger` if the delete fails.
    fn remove_applied(&self, id: &str) -> Result<bool, MigrationError>;
}

/// Check that `table` is a plain, optionally schema-qualified identifier
///
/// The name is interpolated into SQL, so anything else is refused.
///
/// # Errors
///
/// Returns `MigrationError::InvalidLedgerTable`.
pub fn validate_table_name(table: &str) -> Result<(), MigrationError> {
    if TABLE_NAME.is_match(table) {
        Ok(())
    } else {
        Err(MigrationError::InvalidLedgerTable(table.to_string()))
    }
}

/// Ledger stored in a PostgreSQL table
pub struct PostgresLedger<'a> {
    executor: &'a dyn Executor,
    table: String,
}

impl<'a> PostgresLedger<'a> {
    /// Ledger in the default `migrations_ledger` table
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self {
            executor,
            table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }

    /// Ledger in a custom table
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::InvalidLedgerTable` if `table` is not a plain identifier.
    pub fn with_table(executor: &'a dyn Executor, table: &str) -> Result<Self, MigrationError> {
        validate_table_name(table)?;
        Ok(Self {
            executor,
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn index_name(&self) -> String {
        format!("idx_{}_applied_at", self.table.replace('.', "_"))
    }
}

impl Ledger for PostgresLedger<'_> {
    fn ensure_ready(&self) -> Result<(), MigrationError> {
        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(255) PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            self.table
        );
        self.executor
            .execute(&create_table, &[])
            .map_err(MigrationError::LedgerBootstrap)?;

        let create_index = format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} (applied_at)",
            self.index_name(),
            self.table
        );
        self.executor
            .execute(&create_index, &[])
            .map_err(MigrationError::LedgerBootstrap)?;

        Ok(())
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>, MigrationError> {
        self.ensure_ready()?;

        // `id` only breaks ties between rows written within the same microsecond.
        let sql = format!(
            "SELECT id, name, applied_at::text FROM {} ORDER BY applied_at ASC, id ASC",
            self.table
        );
        let rows = self.executor.query_all(&sql, &[])?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            entries.push(LedgerEntry::from_row(row)?);
        }
        Ok(entries)
    }

    fn record_applied(&self, id: &str, name: &str) -> Result<LedgerEntry, MigrationError> {
        // The store's clock decides `applied_at`, so runners on hosts with skewed
        // clocks still agree on which migration is the most recent.
        let sql = format!(
            "INSERT INTO {} (id, name, applied_at)
             VALUES ($1, $2, clock_timestamp() AT TIME ZONE 'UTC')
             ON CONFLICT (id) DO NOTHING
             RETURNING id, name, applied_at::text",
            self.table
        );
        let rows = self.executor.query_all(&sql, &[&id, &name])?;

        let Some(row) = rows.first() else {
            return Err(MigrationError::DuplicateLedgerKey { id: id.to_string() });
        };
        let entry = LedgerEntry::from_row(row)?;

        log::debug!("Recorded migration {id} in {}", self.table);
        Ok(entry)
    }

    fn remove_applied(&self, id: &str) -> Result<bool, MigrationError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let deleted = self.executor.execute(&sql, &[&id])?;

        log::debug!("Removed migration {id} from {} ({deleted} row(s))", self.table);
        Ok(deleted > 0)
    }
}
