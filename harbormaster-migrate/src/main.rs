//! Harbormaster Migration CLI Tool
//!
//! Applies, reverses and reports the application's schema migrations. Exit code 0 on
//! success, 1 on any failure, 2 for usage errors (before a connection is opened).

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use harbormaster::migration::{MigrationRunner, PostgresLedger};
use harbormaster::{connect, redact, PostgresExecutor};
use harbormaster_migrate::catalog;
use harbormaster_migrate::cli::{Cli, Commands};
use harbormaster_migrate::console::{render_status, status_json, ConsoleReporter};
use harbormaster_migrate::options::{load_settings, resolve_database_url};
use std::process;

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .init();

    // One invocation runs strictly sequentially
    may::config().set_workers(1);

    let announce = cli.announces_success();
    match run(cli) {
        Ok(()) => {
            if announce {
                println!("{} Success", "✅".green());
            }
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{} {e:#}", "❌ Error:".red().bold());
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.selected_command();
    let settings = load_settings(cli.config.as_deref()).context("Failed to load settings")?;

    let database_url = resolve_database_url(
        cli.database_url.as_deref(),
        |var| std::env::var(var).ok(),
        &settings,
    )
    .context(
        "Database URL not provided. Use --database-url or set HARBORMASTER_DATABASE_URL or DATABASE_URL",
    )?;
    let ledger_table = cli.ledger_table.unwrap_or(settings.ledger.table);

    let registry = catalog::registry()?;

    log::debug!("Connecting to {}", redact(&database_url));
    let client = connect(&database_url)
        .with_context(|| format!("Error connecting to {}", redact(&database_url)))?;
    let executor = PostgresExecutor::new(client);
    let ledger = PostgresLedger::with_table(&executor, &ledger_table)?;

    let reporter = ConsoleReporter::new(cli.quiet);
    let runner = MigrationRunner::new(&registry, &ledger, &executor).with_reporter(&reporter);

    match command {
        Commands::Up { dry_run } => handle_up(&runner, dry_run),
        Commands::Down { dry_run } => handle_down(&runner, dry_run),
        Commands::Status { json } => handle_status(&runner, json),
    }
}

fn handle_up(runner: &MigrationRunner<'_>, dry_run: bool) -> anyhow::Result<()> {
    if dry_run {
        let pending = runner.pending()?;
        if pending.is_empty() {
            println!("No pending migrations to apply");
            return Ok(());
        }

        println!("Would apply {} migration(s):", pending.len());
        for (i, migration) in pending.iter().enumerate() {
            println!("  {}. {} ({})", i + 1, migration.name(), migration.id());
        }
        return Ok(());
    }

    runner.run_pending()?;
    Ok(())
}

fn handle_down(runner: &MigrationRunner<'_>, dry_run: bool) -> anyhow::Result<()> {
    if dry_run {
        match runner.rollback_target()? {
            Some(migration) => {
                println!("Would roll back: {} ({})", migration.name(), migration.id());
            }
            None => println!("No applied migrations to rollback"),
        }
        return Ok(());
    }

    runner.rollback_last()?;
    Ok(())
}

fn handle_status(runner: &MigrationRunner<'_>, json: bool) -> anyhow::Result<()> {
    let status = runner.status()?;

    if json {
        println!("{}", status_json(&status)?);
    } else {
        print!("{}", render_status(&status));
    }
    Ok(())
}
