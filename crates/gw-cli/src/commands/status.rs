//! Status command implementation

use std::collections::HashMap;

use anyhow::{Context, Result};
use gw_core::MigrationStore;
use gw_db::{Ledger, SqliteDb};
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};

/// One row of the status report.
#[derive(Debug, Serialize)]
struct StatusRow {
    id: String,
    description: String,
    applied_at: Option<String>,
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let store = MigrationStore::new(&global.dir);
    let migrations = store
        .list()
        .with_context(|| format!("Failed to discover migrations in {}", global.dir))?;

    let db = SqliteDb::new(&global.db)
        .with_context(|| format!("Failed to open database {}", global.db))?;
    let ledger = Ledger::new(&db);

    let mut applied: HashMap<String, String> = ledger
        .entries()?
        .into_iter()
        .map(|e| (e.migration_id, e.applied_at))
        .collect();

    let mut rows: Vec<StatusRow> = migrations
        .iter()
        .map(|m| StatusRow {
            id: m.id.clone(),
            description: m.description.clone(),
            applied_at: applied.remove(&m.id),
        })
        .collect();

    // Ledger entries with no matching file still count as applied history;
    // flag them so a deleted or renamed file is visible in the audit.
    let mut orphans: Vec<StatusRow> = applied
        .into_iter()
        .map(|(id, applied_at)| StatusRow {
            id,
            description: "(no migration file)".to_string(),
            applied_at: Some(applied_at),
        })
        .collect();
    orphans.sort_by(|a, b| a.id.cmp(&b.id));
    rows.extend(orphans);
    rows.sort_by(|a, b| a.id.cmp(&b.id));

    match args.output {
        StatusOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        StatusOutput::Table => {
            if rows.is_empty() {
                println!("No migrations found in {}", global.dir);
                return Ok(());
            }
            let pending = rows.iter().filter(|r| r.applied_at.is_none()).count();
            println!("Migrations for {} ({} pending):\n", global.db, pending);
            for row in &rows {
                let state = match &row.applied_at {
                    Some(at) => format!("applied {at}"),
                    None => "pending".to_string(),
                };
                println!("  {} {:<40} {}", row.id, row.description, state);
            }
        }
    }
    Ok(())
}
