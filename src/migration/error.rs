//! Migration-specific error types

use crate::executor::StoreError;
use crate::migration::Direction;
use thiserror::Error;

/// Migration-specific errors
///
/// None of these are retried. They surface to the caller as-is; after any failure
/// `MigrationRunner::status()` tells exactly which migrations are applied. Store
/// failures are carried as the error's `source()`, not repeated in its message.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Two registry entries share an id
    #[error("Migration id '{id}' is registered more than once")]
    DuplicateMigrationId { id: String },

    /// The ledger table could not be created or reached
    #[error("Could not prepare the migration ledger")]
    LedgerBootstrap(#[source] StoreError),

    /// An `up` or `down` operation reported failure
    #[error("Migration '{id}' ({name}) failed while running {direction}")]
    ExecutionFailed {
        id: String,
        name: String,
        direction: Direction,
        #[source]
        source: StoreError,
    },

    /// The ledger names a migration the registry no longer defines
    #[error(
        "Applied migration '{id}' is not in the registry.\n\
         Suggestion: Restore its definition; the ledger and the registry have drifted apart"
    )]
    MigrationNotFound { id: String },

    /// An insert collided with an existing ledger row
    #[error("Migration '{id}' is already recorded in the ledger")]
    DuplicateLedgerKey { id: String },

    /// A ledger read or write failed after bootstrap
    #[error("Migration ledger error")]
    Ledger(#[from] StoreError),

    /// The configured ledger table name is not a plain SQL identifier
    #[error("Invalid ledger table name '{0}': expected [schema.]identifier")]
    InvalidLedgerTable(String),
}

impl MigrationError {
    /// Id of the migration the error is about, when there is one
    pub fn migration_id(&self) -> Option<&str> {
        match self {
            MigrationError::DuplicateMigrationId { id }
            | MigrationError::ExecutionFailed { id, .. }
            | MigrationError::MigrationNotFound { id }
            | MigrationError::DuplicateLedgerKey { id } => Some(id),
            MigrationError::LedgerBootstrap(_)
            | MigrationError::Ledger(_)
            | MigrationError::InvalidLedgerTable(_) => None,
        }
    }
}
