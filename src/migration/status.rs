//! Migration status report

use crate::migration::{LedgerEntry, MigrationRegistry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

/// One registered migration and whether it is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub id: String,
    pub name: String,

    /// When it was applied; `None` if unapplied
    pub applied_at: Option<DateTime<Utc>>,
}

impl StatusLine {
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.applied_at.is_some()
    }
}

/// Applied/unapplied state of every registered migration, in registry order
#[derive(Debug, Clone, Serialize)]
pub struct MigrationStatus {
    /// One line per registry entry
    pub lines: Vec<StatusLine>,

    /// Ledger entries whose id is not in the registry
    pub orphaned: Vec<LedgerEntry>,
}

impl MigrationStatus {
    /// Join the registry against a ledger snapshot
    #[must_use]
    pub fn new(registry: &MigrationRegistry, entries: Vec<LedgerEntry>) -> Self {
        let mut by_id: HashMap<String, LedgerEntry> = entries
            .into_iter()
            .map(|entry| (entry.id.clone(), entry))
            .collect();

        let lines = registry
            .list()
            .iter()
            .map(|migration| StatusLine {
                id: migration.id().to_string(),
                name: migration.name().to_string(),
                applied_at: by_id.remove(migration.id()).map(|entry| entry.applied_at),
            })
            .collect();

        let mut orphaned: Vec<LedgerEntry> = by_id.into_values().collect();
        orphaned.sort_by(|a, b| a.applied_at.cmp(&b.applied_at).then_with(|| a.id.cmp(&b.id)));

        Self { lines, orphaned }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.lines.iter().filter(|line| line.is_applied()).count()
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.total() - self.applied_count()
    }

    /// Check if all migrations are applied
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_count() == 0
    }
}
