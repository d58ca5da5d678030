//! Metrics and tracing hooks
//!
//! With the `metrics` feature, counters and histograms are recorded on the global
//! OpenTelemetry meter named `harbormaster`. Nothing is exported until the embedding
//! application installs a meter provider.
//!
//! With the `tracing` feature, [`tracing_helpers`] builds the spans used around store
//! calls and migration steps.

#[cfg(feature = "metrics")]
pub use self::otel::{MigrationMetrics, METRICS};

#[cfg(feature = "metrics")]
mod otel {
    use crate::migration::Direction;
    use once_cell::sync::Lazy;
    use opentelemetry::{
        global,
        metrics::{Counter, Histogram},
        KeyValue,
    };
    use std::time::Duration;

    pub static METRICS: Lazy<MigrationMetrics> = Lazy::new(MigrationMetrics::init);

    pub struct MigrationMetrics {
        pub migrations_applied: Counter<u64>,
        pub migrations_rolled_back: Counter<u64>,
        pub migration_failures: Counter<u64>,
        pub migration_duration: Histogram<f64>,
        pub queries_total: Counter<u64>,
        pub query_errors: Counter<u64>,
        pub query_duration: Histogram<f64>,
    }

    impl MigrationMetrics {
        pub fn init() -> Self {
            let meter = global::meter("harbormaster");

            Self {
                migrations_applied: meter
                    .u64_counter("harbormaster_migrations_applied_total")
                    .with_description("Migrations whose up operation completed and was recorded")
                    .build(),
                migrations_rolled_back: meter
                    .u64_counter("harbormaster_migrations_rolled_back_total")
                    .with_description("Migrations whose down operation completed and was unrecorded")
                    .build(),
                migration_failures: meter
                    .u64_counter("harbormaster_migration_failures_total")
                    .with_description("Failed up/down operations")
                    .build(),
                migration_duration: meter
                    .f64_histogram("harbormaster_migration_duration_seconds")
                    .with_description("Duration of a single up/down operation")
                    .build(),
                queries_total: meter
                    .u64_counter("harbormaster_queries_total")
                    .with_description("Statements sent to the store")
                    .build(),
                query_errors: meter
                    .u64_counter("harbormaster_query_errors_total")
                    .with_description("Statements the store rejected")
                    .build(),
                query_duration: meter
                    .f64_histogram("harbormaster_query_duration_seconds")
                    .with_description("Duration of store statements")
                    .build(),
            }
        }

        pub fn record_query_duration(&self, elapsed: Duration) {
            self.queries_total.add(1, &[]);
            self.query_duration.record(elapsed.as_secs_f64(), &[]);
        }

        pub fn record_query_error(&self) {
            self.query_errors.add(1, &[]);
        }

        pub fn record_migration(&self, direction: Direction, elapsed: Duration) {
            let attrs = [KeyValue::new("direction", direction.as_str())];
            match direction {
                Direction::Up => self.migrations_applied.add(1, &attrs),
                Direction::Down => self.migrations_rolled_back.add(1, &attrs),
            }
            self.migration_duration.record(elapsed.as_secs_f64(), &attrs);
        }

        pub fn record_migration_failure(&self, direction: Direction) {
            self.migration_failures
                .add(1, &[KeyValue::new("direction", direction.as_str())]);
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{info_span, Span};

    const MAX_STATEMENT_LEN: usize = 100;

    fn truncate(query: &str) -> &str {
        let query = query.trim();
        match query.char_indices().nth(MAX_STATEMENT_LEN) {
            Some((idx, _)) => &query[..idx],
            None => query,
        }
    }

    pub fn execute_query_span(query: &str) -> Span {
        info_span!("harbormaster.query", db.statement = truncate(query))
    }

    pub fn connect_span() -> Span {
        info_span!("harbormaster.connect")
    }

    pub fn transaction_span(action: &'static str) -> Span {
        info_span!("harbormaster.transaction", action)
    }

    pub fn migration_span(id: &str, direction: &'static str) -> Span {
        info_span!("harbormaster.migration", migration.id = id, direction)
    }

    #[cfg(test)]
    mod tests {
        use super::truncate;

        #[test]
        fn test_truncate_long_statement() {
            let sql = "x".repeat(250);
            assert_eq!(truncate(&sql).len(), 100);
            assert_eq!(truncate("  SELECT 1  "), "SELECT 1");
        }
    }
}
