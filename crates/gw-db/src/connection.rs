//! Target database connection wrapper
//!
//! [`SqliteDb`] owns a single rusqlite [`Connection`]. Migration execution
//! is strictly sequential, so there is no pooling and no interior locking;
//! the executor borrows the connection exclusively for one apply call.

use crate::error::{DbError, DbResult};
use rusqlite::Connection;
use std::path::Path;

/// Wrapper around one SQLite connection to the target database.
pub struct SqliteDb {
    conn: Connection,
}

impl SqliteDb {
    /// Open (or create) the target database at `path`.
    ///
    /// Foreign-key enforcement is switched on at the session level; SQLite
    /// defaults it to off.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::Connection(format!("{e}: {}", path.display())))?;
        Self::configure(conn)
    }

    /// Open an in-memory database. Useful for tests and dry runs.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::Connection(e.to_string()))?;
        Self::configure(conn)
    }

    /// Open from a path string, treating `:memory:` specially.
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    fn configure(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| DbError::Connection(format!("failed to set pragmas: {e}")))?;
        Ok(Self { conn })
    }

    /// Borrow the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Whether foreign-key enforcement is currently enabled on this session.
    pub fn foreign_keys_enabled(&self) -> DbResult<bool> {
        let on: i64 = self
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .map_err(|e| DbError::Connection(format!("failed to read foreign_keys: {e}")))?;
        Ok(on != 0)
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back
    /// on error.
    pub fn transaction<F, T>(&self, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::Transaction(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::Transaction(format!("COMMIT failed: {commit_err}")));
                }
            }
            Err(_) => {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
