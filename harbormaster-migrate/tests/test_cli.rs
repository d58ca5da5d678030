use clap::error::ErrorKind;
use clap::Parser;
use harbormaster_migrate::cli::{Cli, Commands};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("harbormaster-migrate").chain(args.iter().copied()))
        .unwrap_or_else(|e| panic!("{args:?} should parse: {e}"))
}

fn parse_err(args: &[&str]) -> clap::Error {
    Cli::try_parse_from(std::iter::once("harbormaster-migrate").chain(args.iter().copied()))
        .expect_err("arguments should be rejected")
}

#[test]
fn test_no_command_means_up() {
    let cli = parse(&[]);
    assert!(cli.command.is_none());
    assert_eq!(cli.selected_command(), Commands::Up { dry_run: false });
}

#[test]
fn test_up_dry_run() {
    assert_eq!(parse(&["up", "--dry-run"]).selected_command(), Commands::Up { dry_run: true });
}

#[test]
fn test_rollback_is_an_alias_of_down() {
    assert_eq!(parse(&["down"]).selected_command(), Commands::Down { dry_run: false });
    assert_eq!(parse(&["rollback"]).selected_command(), Commands::Down { dry_run: false });
    assert_eq!(
        parse(&["rollback", "--dry-run"]).selected_command(),
        Commands::Down { dry_run: true }
    );
}

#[test]
fn test_unknown_command_is_a_usage_error() {
    let err = parse_err(&["migrate-everything"]);

    // Parsing runs before settings are read or a connection is opened.
    assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let err = parse_err(&["-q", "-v", "status"]);
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&[
        "status",
        "--json",
        "--database-url",
        "postgresql://localhost/app",
        "--ledger-table",
        "ops.schema_history",
    ]);

    assert_eq!(cli.selected_command(), Commands::Status { json: true });
    assert_eq!(cli.database_url.as_deref(), Some("postgresql://localhost/app"));
    assert_eq!(cli.ledger_table.as_deref(), Some("ops.schema_history"));
}

#[test]
fn test_log_filter_follows_verbosity() {
    assert_eq!(parse(&[]).log_filter(), "info");
    assert_eq!(parse(&["-v"]).log_filter(), "debug");
    assert_eq!(parse(&["-q", "up"]).log_filter(), "error");
}

#[test]
fn test_success_line_is_kept_off_json_and_quiet_output() {
    assert!(parse(&["up"]).announces_success());
    assert!(parse(&["status"]).announces_success());
    assert!(!parse(&["status", "--json"]).announces_success());
    assert!(!parse(&["-q", "down"]).announces_success());
}
