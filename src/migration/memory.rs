//! In-memory ledger
//!
//! `MemoryLedger` keeps entries in process memory. Clones share the same rows, so a
//! clone handed to a second runner behaves like a second process pointed at the same
//! store. Used for tests and dry runs.

use crate::executor::StoreError;
use crate::migration::ledger::Ledger;
use crate::migration::record::LedgerEntry;
use crate::migration::MigrationError;
use chrono::{SubsecRound, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Shared {
    rows: Mutex<Vec<LedgerEntry>>,
    unreachable: AtomicBool,
}

/// Ledger held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    shared: Arc<Shared>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from pre-existing entries, e.g. to model a ledger written by earlier runs
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::DuplicateLedgerKey` if two entries share an id.
    pub fn with_entries(entries: Vec<LedgerEntry>) -> Result<Self, MigrationError> {
        let ledger = Self::new();
        {
            let mut rows = ledger.rows();
            for entry in entries {
                if rows.iter().any(|row| row.id == entry.id) {
                    return Err(MigrationError::DuplicateLedgerKey { id: entry.id });
                }
                rows.push(entry);
            }
        }
        Ok(ledger)
    }

    /// Make every following `ensure_ready` fail, as an unreachable store would
    pub fn fail_bootstrap(&self) {
        self.shared.unreachable.store(true, Ordering::SeqCst);
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every mutation is a single push or retain, so rows behind a poisoned lock are
    // still consistent.
    fn rows(&self) -> MutexGuard<'_, Vec<LedgerEntry>> {
        self.shared.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Ledger for MemoryLedger {
    fn ensure_ready(&self) -> Result<(), MigrationError> {
        if self.shared.unreachable.load(Ordering::SeqCst) {
            return Err(MigrationError::LedgerBootstrap(StoreError::Other(
                "ledger store is unreachable".to_string(),
            )));
        }
        Ok(())
    }

    fn entries(&self) -> Result<Vec<LedgerEntry>, MigrationError> {
        self.ensure_ready()?;

        let mut entries = self.rows().clone();
        // Stable, so entries sharing a timestamp keep insertion order.
        entries.sort_by_key(|entry| entry.applied_at);
        Ok(entries)
    }

    fn record_applied(&self, id: &str, name: &str) -> Result<LedgerEntry, MigrationError> {
        let mut rows = self.rows();
        if rows.iter().any(|row| row.id == id) {
            return Err(MigrationError::DuplicateLedgerKey { id: id.to_string() });
        }

        let entry = LedgerEntry::new(id, name, Utc::now().trunc_subsecs(6));
        rows.push(entry.clone());
        Ok(entry)
    }

    fn remove_applied(&self, id: &str) -> Result<bool, MigrationError> {
        let mut rows = self.rows();
        let before = rows.len();
        rows.retain(|row| row.id != id);
        Ok(rows.len() < before)
    }
}
