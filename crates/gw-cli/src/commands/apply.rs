//! Apply command implementation

use anyhow::{Context, Result};
use gw_core::MigrationStore;
use gw_db::{Runner, SqliteDb};

use crate::cli::{ApplyArgs, GlobalArgs};

/// Execute the apply command
pub(crate) fn execute(args: &ApplyArgs, global: &GlobalArgs) -> Result<()> {
    let store = MigrationStore::new(&global.dir);
    let migrations = store
        .list()
        .with_context(|| format!("Failed to discover migrations in {}", global.dir))?;

    if migrations.is_empty() {
        println!("No migration files found in {}", global.dir);
        return Ok(());
    }
    log::debug!("discovered {} migration file(s)", migrations.len());

    let db = SqliteDb::new(&global.db)
        .with_context(|| format!("Failed to open database {}", global.db))?;
    let runner = Runner::new(&db);

    let pending = runner.pending(&migrations)?;
    if pending.is_empty() {
        println!(
            "Nothing to apply: all {} migration(s) already recorded",
            migrations.len()
        );
        return Ok(());
    }

    if args.dry_run {
        println!("Dry run - would apply {} migration(s):", pending.len());
        for migration in &pending {
            println!(
                "  {} ({} statements)",
                migration.label(),
                migration.statements.len()
            );
        }
        return Ok(());
    }

    println!(
        "Applying {} migration(s) to {}",
        pending.len(),
        global.db
    );

    // A failure here carries the migration id and statement index; main
    // surfaces it on stderr with a non-zero exit.
    let summary = runner.run(&migrations)?;

    for label in &summary.applied {
        println!("  Applied: {label}");
    }
    println!();
    println!(
        "{} applied, {} already up to date",
        summary.applied.len(),
        summary.skipped
    );
    Ok(())
}
