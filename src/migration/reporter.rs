//! Progress reporting
//!
//! The runner announces what it does through a [`Reporter`] and never formats output
//! itself. The library logs by default; the CLI plugs in a console reporter.

use crate::executor::StoreError;
use crate::migration::Direction;
use std::time::Duration;

/// Something the runner did or is about to do
#[derive(Debug, Clone, Copy)]
pub enum MigrationEvent<'a> {
    /// `run_pending` found `pending` migrations to apply
    RunStarted { pending: usize },

    /// `run_pending` found nothing to do
    NothingPending,

    MigrationStarted { id: &'a str, name: &'a str },

    MigrationApplied {
        id: &'a str,
        name: &'a str,
        elapsed: Duration,
    },

    /// An `up` or `down` operation failed; the run stops here
    MigrationFailed {
        id: &'a str,
        name: &'a str,
        direction: Direction,
        error: &'a StoreError,
    },

    /// `run_pending` finished applying `applied` migrations
    RunCompleted { applied: usize, elapsed: Duration },

    RollbackStarted { id: &'a str, name: &'a str },

    MigrationRolledBack {
        id: &'a str,
        name: &'a str,
        elapsed: Duration,
    },

    /// `rollback_last` found an empty ledger
    NothingToRollback,
}

/// Sink for [`MigrationEvent`]s
pub trait Reporter {
    fn report(&self, event: &MigrationEvent<'_>);
}

/// Forwards events to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, event: &MigrationEvent<'_>) {
        match *event {
            MigrationEvent::RunStarted { pending } => {
                log::info!("Applying {pending} pending migration(s)");
            }
            MigrationEvent::NothingPending => log::info!("No pending migrations"),
            MigrationEvent::MigrationStarted { id, name } => {
                log::info!("Running migration {id}: {name}");
            }
            MigrationEvent::MigrationApplied { id, name, elapsed } => {
                log::info!("Applied migration {id}: {name} ({}ms)", elapsed.as_millis());
            }
            MigrationEvent::MigrationFailed {
                id,
                name,
                direction,
                error,
            } => {
                log::error!("Migration {id} ({name}) failed while running {direction}: {error}");
            }
            MigrationEvent::RunCompleted { applied, elapsed } => {
                log::info!("Applied {applied} migration(s) in {}ms", elapsed.as_millis());
            }
            MigrationEvent::RollbackStarted { id, name } => {
                log::info!("Rolling back migration {id}: {name}");
            }
            MigrationEvent::MigrationRolledBack { id, name, elapsed } => {
                log::info!("Rolled back migration {id}: {name} ({}ms)", elapsed.as_millis());
            }
            MigrationEvent::NothingToRollback => log::info!("No migrations to roll back"),
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _event: &MigrationEvent<'_>) {}
}
