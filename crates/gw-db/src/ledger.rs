//! Applied-migration ledger
//!
//! A persisted record of which migrations have run, kept in the target
//! database itself so external tooling can audit applied state:
//! `schema_migrations(migration_id TEXT PRIMARY KEY, applied_at TEXT)`.

use crate::connection::SqliteDb;
use crate::error::{DbError, DbResult};
use rusqlite::params;
use serde::Serialize;

/// Name of the backing table in the target database.
pub const LEDGER_TABLE: &str = "schema_migrations";

/// One row of the ledger.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub migration_id: String,
    /// RFC 3339 UTC timestamp of when the migration committed.
    pub applied_at: String,
}

/// Ledger over the target database.
///
/// Self-bootstrapping: the backing table is created lazily on first use, so
/// the runner has no separate init step.
pub struct Ledger<'a> {
    db: &'a SqliteDb,
}

impl<'a> Ledger<'a> {
    pub fn new(db: &'a SqliteDb) -> Self {
        Self { db }
    }

    fn ensure_table(&self) -> DbResult<()> {
        self.db
            .conn()
            .execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {LEDGER_TABLE} (
                    migration_id TEXT PRIMARY KEY,
                    applied_at TEXT NOT NULL
                )"
            ))
            .map_err(|e| DbError::LedgerWrite(format!("failed to create ledger table: {e}")))
    }

    /// Whether `id` has already been applied.
    pub fn is_applied(&self, id: &str) -> DbResult<bool> {
        self.ensure_table()?;
        let count: i64 = self
            .db
            .conn()
            .query_row(
                &format!("SELECT COUNT(*) FROM {LEDGER_TABLE} WHERE migration_id = ?1"),
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerRead(e.to_string()))?;
        Ok(count > 0)
    }

    /// Record `id` as applied at `applied_at`.
    ///
    /// An already-recorded id is a no-op, so retries after a crash between
    /// apply and record never hard-fail here.
    pub fn record_applied(&self, id: &str, applied_at: &str) -> DbResult<()> {
        self.ensure_table()?;
        self.db
            .conn()
            .execute(
                &format!(
                    "INSERT OR IGNORE INTO {LEDGER_TABLE} (migration_id, applied_at) VALUES (?1, ?2)"
                ),
                params![id, applied_at],
            )
            .map_err(|e| DbError::LedgerWrite(e.to_string()))?;
        Ok(())
    }

    /// All ledger rows, ordered by migration id ascending.
    pub fn entries(&self) -> DbResult<Vec<LedgerEntry>> {
        self.ensure_table()?;
        let conn = self.db.conn();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT migration_id, applied_at FROM {LEDGER_TABLE} ORDER BY migration_id"
            ))
            .map_err(|e| DbError::LedgerRead(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(LedgerEntry {
                    migration_id: row.get(0)?,
                    applied_at: row.get(1)?,
                })
            })
            .map_err(|e| DbError::LedgerRead(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::LedgerRead(e.to_string()))
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
