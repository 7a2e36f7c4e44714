//! Statement executor
//!
//! Applies one migration's statements in file order against the target
//! database. Two execution paths:
//!
//! - Ordinary migrations run inside a single `BEGIN`/`COMMIT`, rolled back
//!   on the first failing statement, so the pre-migration schema survives a
//!   failure intact.
//! - Migrations that toggle `PRAGMA foreign_keys` (the rebuild pattern for
//!   tables referenced by foreign keys) run sequentially outside any
//!   transaction: SQLite silently ignores that pragma inside a transaction,
//!   so wrapping would defeat the suspension. Retry safety for this path
//!   comes from the authoring contract (`IF NOT EXISTS` idioms), and
//!   foreign-key enforcement is asserted re-enabled before the migration
//!   counts as complete.
//!
//! Rebuild copies written as `INSERT INTO <dst> SELECT * FROM <src>` get a
//! pre-flight column comparison and are rewritten to an explicit column
//! list before execution, so a silently-wrong positional copy can never run.

use crate::connection::SqliteDb;
use crate::error::{DbError, DbResult};
use gw_core::Migration;
use rusqlite::Connection;

/// Executes single migrations against the target database.
pub struct Executor<'a> {
    db: &'a SqliteDb,
}

impl<'a> Executor<'a> {
    pub fn new(db: &'a SqliteDb) -> Self {
        Self { db }
    }

    /// Apply all of `migration`'s statements, in order.
    pub fn apply(&self, migration: &Migration) -> DbResult<()> {
        let suspends_fk = migration
            .statements
            .iter()
            .any(|s| is_foreign_keys_pragma(s));

        if suspends_fk {
            log::debug!(
                "migration {} toggles foreign_keys; running without a transaction",
                migration.label()
            );
            if let Err(e) = self.run_statements(self.db.conn(), migration) {
                // Best effort: never leave enforcement off because a
                // statement in the middle of a rebuild failed.
                let _ = self.db.conn().execute_batch("PRAGMA foreign_keys=ON");
                return Err(e);
            }
        } else {
            self.db
                .transaction(|conn| self.run_statements(conn, migration))?;
        }

        // Post-condition: a migration that turned enforcement off must have
        // turned it back on.
        if !self.db.foreign_keys_enabled()? {
            return Err(DbError::Consistency(migration.label()));
        }
        Ok(())
    }

    fn run_statements(&self, conn: &Connection, migration: &Migration) -> DbResult<()> {
        for (index, statement) in migration.statements.iter().enumerate() {
            let sql = match parse_star_copy(statement) {
                Some((dst, src)) => self.preflight_copy(conn, migration, index, &dst, &src)?,
                None => statement.clone(),
            };
            conn.execute_batch(&sql).map_err(|e| DbError::Statement {
                migration: migration.label(),
                index,
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Validate a `SELECT *` rebuild copy and rewrite it with explicit
    /// column lists.
    ///
    /// Positional `SELECT *` copies are only correct when both tables have
    /// identical column lists, so any divergence in count, name, or order is
    /// a hard failure before the copy is issued.
    fn preflight_copy(
        &self,
        conn: &Connection,
        migration: &Migration,
        index: usize,
        dst: &str,
        src: &str,
    ) -> DbResult<String> {
        let mismatch = |message: String| DbError::SchemaMismatch {
            migration: migration.label(),
            index,
            message,
        };

        let dst_cols = table_columns(conn, dst)
            .map_err(|e| mismatch(format!("cannot inspect '{dst}': {e}")))?;
        let src_cols = table_columns(conn, src)
            .map_err(|e| mismatch(format!("cannot inspect '{src}': {e}")))?;

        if dst_cols.is_empty() {
            return Err(mismatch(format!("copy target '{dst}' does not exist")));
        }
        if src_cols.is_empty() {
            return Err(mismatch(format!("copy source '{src}' does not exist")));
        }
        if dst_cols != src_cols {
            return Err(mismatch(format!(
                "'{dst}' columns [{}] do not match '{src}' columns [{}]",
                dst_cols.join(", "),
                src_cols.join(", ")
            )));
        }

        let list = dst_cols
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        log::debug!("rewriting star copy {src} -> {dst} to explicit column list");
        Ok(format!(
            "INSERT INTO {} ({list}) SELECT {list} FROM {}",
            quote_ident(dst),
            quote_ident(src)
        ))
    }
}

/// Column names of `table` in declaration order, empty if the table does
/// not exist.
fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    rows.collect()
}

/// Whether `statement` is a `PRAGMA foreign_keys` toggle.
fn is_foreign_keys_pragma(statement: &str) -> bool {
    let mut tokens = statement.split(|c: char| c.is_whitespace() || c == '=');
    tokens.next().is_some_and(|t| t.eq_ignore_ascii_case("pragma"))
        && tokens
            .find(|t| !t.is_empty())
            .is_some_and(|t| t.eq_ignore_ascii_case("foreign_keys"))
}

/// Match `INSERT INTO <dst> SELECT * FROM <src>` and return both table
/// names, unquoted. Anything more elaborate (column lists, WHERE clauses)
/// is not a positional star copy and passes through untouched.
fn parse_star_copy(statement: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = statement.split_whitespace().collect();
    if tokens.len() != 7 {
        return None;
    }
    let keyword = |i: usize, word: &str| tokens[i].eq_ignore_ascii_case(word);
    if keyword(0, "insert")
        && keyword(1, "into")
        && keyword(3, "select")
        && tokens[4] == "*"
        && keyword(5, "from")
    {
        Some((unquote_ident(tokens[2]), unquote_ident(tokens[6])))
    } else {
        None
    }
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn unquote_ident(ident: &str) -> String {
    let inner = |q: char| {
        ident
            .strip_prefix(q)
            .and_then(|s| s.strip_suffix(q))
            .map(str::to_string)
    };
    inner('"')
        .map(|s| s.replace("\"\"", "\""))
        .or_else(|| inner('`'))
        .or_else(|| inner('\''))
        .unwrap_or_else(|| ident.to_string())
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
