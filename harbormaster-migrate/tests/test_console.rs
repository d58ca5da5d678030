use chrono::{TimeZone, Utc};
use harbormaster::migration::{
    Direction, LedgerEntry, Migration, MigrationEvent, MigrationRegistry, MigrationStatus, Sql,
};
use harbormaster::StoreError;
use harbormaster_migrate::console::{render_event, render_status, status_json};
use std::time::Duration;

fn registry() -> MigrationRegistry {
    MigrationRegistry::new(vec![
        Migration::new("001", "create users", Sql::new("SELECT 1"), Sql::new("SELECT 1")),
        Migration::new("002", "create invoices", Sql::new("SELECT 1"), Sql::new("SELECT 1")),
    ])
    .unwrap()
}

fn half_applied() -> MigrationStatus {
    let at = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
    MigrationStatus::new(&registry(), vec![LedgerEntry::new("001", "create users", at)])
}

#[test]
fn test_status_table() {
    let text = render_status(&half_applied());

    assert!(text.contains("Migration Status:"));
    assert!(text.contains("create users (001)"));
    assert!(text.contains("create invoices (002)"));
    assert!(text.contains("✓"));
    assert!(text.contains("○"));
    assert!(text.contains("Applied: 1 / 2 migrations"));
    assert!(!text.contains("no longer registered"));
}

#[test]
fn test_status_table_lists_orphans() {
    let at = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
    let status = MigrationStatus::new(&registry(), vec![LedgerEntry::new("000", "legacy", at)]);

    let text = render_status(&status);

    assert!(text.contains("no longer registered"));
    assert!(text.contains("legacy (000)"));
    assert!(text.contains("Applied: 0 / 2 migrations"));
}

#[test]
fn test_status_json() {
    let json = status_json(&half_applied()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["applied"], 1);
    assert_eq!(value["total"], 2);
    assert_eq!(value["up_to_date"], false);
    assert_eq!(value["migrations"][0]["id"], "001");
    assert!(value["migrations"][0]["applied_at"].is_string());
    assert!(value["migrations"][1]["applied_at"].is_null());
    assert_eq!(value["orphaned"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_event_lines() {
    assert!(render_event(&MigrationEvent::RunStarted { pending: 2 }).contains("Running 2 migration(s)..."));
    assert!(render_event(&MigrationEvent::MigrationStarted {
        id: "001",
        name: "create users"
    })
    .contains("Running: create users"));
    assert!(render_event(&MigrationEvent::MigrationApplied {
        id: "001",
        name: "create users",
        elapsed: Duration::from_millis(12),
    })
    .contains("Completed: create users (12ms)"));
    assert!(render_event(&MigrationEvent::NothingToRollback).contains("No migrations to rollback"));
}

#[test]
fn test_failure_lines_name_direction() {
    let error = StoreError::Query("relation \"users\" already exists".to_string());

    let up = render_event(&MigrationEvent::MigrationFailed {
        id: "001",
        name: "create users",
        direction: Direction::Up,
        error: &error,
    });
    let down = render_event(&MigrationEvent::MigrationFailed {
        id: "001",
        name: "create users",
        direction: Direction::Down,
        error: &error,
    });

    assert!(up.contains("Failed: create users"));
    assert!(up.contains("already exists"));
    assert!(down.contains("Rollback failed: create users"));
}
