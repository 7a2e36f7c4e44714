//! Groundwork CLI - an ordered, ledger-tracked schema migration runner

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{apply, new, status};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match &cli.command {
        cli::Commands::Apply(args) => apply::execute(args, &cli.global),
        cli::Commands::Status(args) => status::execute(args, &cli.global),
        cli::Commands::New(args) => new::execute(args, &cli.global),
    }
}
