use crate::executor::{Executor, StoreError};
use crate::migration::{MigrationEvent, Reporter};
use may_postgres::types::ToSql;
use may_postgres::Row;
use std::cell::RefCell;

/// Executor that records statements and fails any statement containing `FAIL`
#[derive(Default)]
pub struct RecordingExecutor {
    statements: RefCell<Vec<String>>,
}

impl RecordingExecutor {
    pub fn statements(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, query: &str, _params: &[&dyn ToSql]) -> Result<u64, StoreError> {
        self.statements.borrow_mut().push(query.to_string());
        if query.contains("FAIL") {
            return Err(StoreError::Query(format!("rejected: {query}")));
        }
        Ok(0)
    }

    fn query_one(&self, _query: &str, _params: &[&dyn ToSql]) -> Result<Row, StoreError> {
        Err(StoreError::Other("not supported".to_string()))
    }

    fn query_all(&self, _query: &str, _params: &[&dyn ToSql]) -> Result<Vec<Row>, StoreError> {
        Ok(Vec::new())
    }
}

/// Reporter that keeps a one-line rendering of each event
#[derive(Default)]
pub struct EventLog {
    events: RefCell<Vec<String>>,
}

impl EventLog {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl Reporter for EventLog {
    fn report(&self, event: &MigrationEvent<'_>) {
        let line = match *event {
            MigrationEvent::RunStarted { pending } => format!("run_started {pending}"),
            MigrationEvent::NothingPending => "nothing_pending".to_string(),
            MigrationEvent::MigrationStarted { id, .. } => format!("started {id}"),
            MigrationEvent::MigrationApplied { id, .. } => format!("applied {id}"),
            MigrationEvent::MigrationFailed { id, direction, .. } => format!("failed {id} {direction}"),
            MigrationEvent::RunCompleted { applied, .. } => format!("run_completed {applied}"),
            MigrationEvent::RollbackStarted { id, .. } => format!("rollback_started {id}"),
            MigrationEvent::MigrationRolledBack { id, .. } => format!("rolled_back {id}"),
            MigrationEvent::NothingToRollback => "nothing_to_rollback".to_string(),
        };
        self.events.borrow_mut().push(line);
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Logger that keeps records per thread, so parallel tests do not see each other's output
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        CAPTURED.with(|captured| {
            captured
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;
static INSTALL_LOGGER: std::sync::Once = std::sync::Once::new();

/// Run `f` and return the log records it emitted on this thread
pub fn capture_logs(f: impl FnOnce()) -> Vec<(log::Level, String)> {
    INSTALL_LOGGER.call_once(|| {
        if log::set_logger(&CAPTURE_LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Trace);
        }
    });

    CAPTURED.with(|captured| captured.borrow_mut().clear());
    f();
    CAPTURED.with(|captured| captured.borrow_mut().drain(..).collect())
}
