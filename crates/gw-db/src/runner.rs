//! Migration runner
//!
//! Orchestrates one pass over an ordered migration set: skip what the
//! ledger already records, apply the rest in sequence, and halt the chain
//! on the first failure. Each migration moves through
//! `Pending -> Applying -> Applied | Failed`; a failure surfaces the
//! migration id and statement index and leaves later migrations untouched.

use crate::connection::SqliteDb;
use crate::error::DbResult;
use crate::executor::Executor;
use crate::ledger::Ledger;
use chrono::Utc;
use gw_core::Migration;

/// Outcome of a full runner pass.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Labels of migrations applied during this pass, in order.
    pub applied: Vec<String>,
    /// Number of migrations skipped because the ledger already records them.
    pub skipped: usize,
}

/// Sequential migration runner over one target database.
pub struct Runner<'a> {
    db: &'a SqliteDb,
}

impl<'a> Runner<'a> {
    pub fn new(db: &'a SqliteDb) -> Self {
        Self { db }
    }

    /// Apply every unapplied migration in ascending id order.
    ///
    /// Re-running after a fix is safe: applied migrations are skipped via
    /// the ledger, and the first failure stops the pass before any later
    /// migration starts.
    pub fn run(&self, migrations: &[Migration]) -> DbResult<RunSummary> {
        let ledger = Ledger::new(self.db);
        let executor = Executor::new(self.db);
        let mut summary = RunSummary::default();

        for migration in migrations {
            if ledger.is_applied(&migration.id)? {
                log::debug!("skipping {}: already applied", migration.label());
                summary.skipped += 1;
                continue;
            }

            log::info!("applying {}", migration.label());
            if let Err(e) = executor.apply(migration) {
                log::error!("migration {} failed: {e}", migration.label());
                return Err(e);
            }
            ledger.record_applied(&migration.id, &Utc::now().to_rfc3339())?;
            summary.applied.push(migration.label());
        }

        Ok(summary)
    }

    /// Migrations from `migrations` that the ledger does not yet record.
    pub fn pending<'m>(&self, migrations: &'m [Migration]) -> DbResult<Vec<&'m Migration>> {
        let ledger = Ledger::new(self.db);
        let mut pending = Vec::new();
        for migration in migrations {
            if !ledger.is_applied(&migration.id)? {
                pending.push(migration);
            }
        }
        Ok(pending)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
