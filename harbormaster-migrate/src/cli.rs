//! Command-line surface of `harbormaster-migrate`

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "harbormaster-migrate")]
#[command(about = "Migration management tool for Harbormaster")]
#[command(version)]
pub struct Cli {
    /// Database connection URL
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Ledger table name (default: migrations_ledger)
    #[arg(long, global = true)]
    pub ledger_table: Option<String>,

    /// Settings file (default: config/config.toml if present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Defaults to `up`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Apply pending migrations
    Up {
        /// Dry run - list pending migrations without running them
        #[arg(long)]
        dry_run: bool,
    },

    /// Roll back the most recently applied migration
    #[command(alias = "rollback")]
    Down {
        /// Dry run - show what would be rolled back
        #[arg(long)]
        dry_run: bool,
    },

    /// Show migration status (applied vs pending)
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// The command to run; `up` when none was given
    pub fn selected_command(&self) -> Commands {
        self.command.unwrap_or(Commands::Up { dry_run: false })
    }

    /// Log filter implied by `-q` / `-v`
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Whether to print the closing success line
    ///
    /// Suppressed for `-q` and for `status --json`, whose stdout must stay parseable.
    pub fn announces_success(&self) -> bool {
        !self.quiet && !matches!(self.selected_command(), Commands::Status { json: true })
    }
}
