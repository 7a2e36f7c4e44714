//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Groundwork - a schema migration runner for SQLite databases
#[derive(Parser, Debug)]
#[command(name = "gw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the target SQLite database (use :memory: for a throwaway run)
    #[arg(short, long, global = true, env = "GW_DATABASE", default_value = "groundwork.db")]
    pub db: String,

    /// Directory containing migration files
    #[arg(short = 'm', long = "dir", global = true, env = "GW_MIGRATIONS", default_value = "migrations")]
    pub dir: String,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply unapplied migrations in ascending id order
    Apply(ApplyArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),

    /// Scaffold the next numbered migration file
    New(NewArgs),
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// List what would be applied without touching the database schema
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Table format
    Table,
    /// JSON output
    Json,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Short slug for the migration, e.g. widen_trade_status
    pub description: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
