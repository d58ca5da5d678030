//! Terminal output for the CLI

use colored::Colorize;
use harbormaster::migration::{Direction, LedgerEntry, MigrationEvent, MigrationStatus, Reporter, StatusLine};
use serde::Serialize;

const RULE_WIDTH: usize = 50;

/// Prints runner progress to the terminal
///
/// Failures go to stderr and are always shown; everything else goes to stdout and is
/// suppressed in quiet mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, event: &MigrationEvent<'_>) {
        let line = render_event(event);
        if matches!(event, MigrationEvent::MigrationFailed { .. }) {
            eprintln!("{line}");
        } else if !self.quiet {
            println!("{line}");
        }
    }
}

/// One terminal line for `event`
pub fn render_event(event: &MigrationEvent<'_>) -> String {
    match *event {
        MigrationEvent::NothingPending => format!("{} No pending migrations", "✓".green()),
        MigrationEvent::RunStarted { pending } => format!("Running {pending} migration(s)..."),
        MigrationEvent::MigrationStarted { name, .. } => format!("  → Running: {name}"),
        MigrationEvent::MigrationApplied { name, elapsed, .. } => format!(
            "  {} Completed: {name} ({}ms)",
            "✓".green(),
            elapsed.as_millis()
        ),
        MigrationEvent::MigrationFailed {
            name,
            direction: Direction::Up,
            error,
            ..
        } => format!("  {} Failed: {name}: {error}", "✗".red()),
        MigrationEvent::MigrationFailed {
            name,
            direction: Direction::Down,
            error,
            ..
        } => format!("{} Rollback failed: {name}: {error}", "✗".red()),
        MigrationEvent::RunCompleted { .. } => {
            format!("{} All migrations completed", "✓".green())
        }
        MigrationEvent::RollbackStarted { name, .. } => format!("Rolling back: {name}"),
        MigrationEvent::MigrationRolledBack { name, .. } => {
            format!("{} Rolled back: {name}", "✓".green())
        }
        MigrationEvent::NothingToRollback => "No migrations to rollback".to_string(),
    }
}

/// Human-readable status table
pub fn render_status(status: &MigrationStatus) -> String {
    let rule = "─".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str("\nMigration Status:\n");
    out.push_str(&rule);
    out.push('\n');

    for line in &status.lines {
        let marker = if line.is_applied() {
            "✓".green()
        } else {
            "○".yellow()
        };
        out.push_str(&format!("  {marker} {} ({})", line.name, line.id));
        if let Some(at) = line.applied_at {
            out.push_str(&format!("  {}", at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed()));
        }
        out.push('\n');
    }

    out.push_str(&rule);
    out.push('\n');

    if !status.orphaned.is_empty() {
        out.push_str(&format!(
            "\n{} Applied but no longer registered:\n",
            "!".yellow().bold()
        ));
        for entry in &status.orphaned {
            out.push_str(&format!("  {} ({})\n", entry.name, entry.id));
        }
    }

    out.push_str(&format!(
        "\nApplied: {} / {} migrations\n",
        status.applied_count(),
        status.total()
    ));
    out
}

#[derive(Serialize)]
struct StatusReport<'a> {
    applied: usize,
    total: usize,
    up_to_date: bool,
    migrations: &'a [StatusLine],
    orphaned: &'a [LedgerEntry],
}

/// Status as pretty-printed JSON
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn status_json(status: &MigrationStatus) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&StatusReport {
        applied: status.applied_count(),
        total: status.total(),
        up_to_date: status.is_up_to_date(),
        migrations: &status.lines,
        orphaned: &status.orphaned,
    })
}
