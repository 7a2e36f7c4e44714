//! Error types for gw-db

use thiserror::Error;

/// Execution-layer errors.
///
/// Every variant halts the runner; nothing here is retried automatically,
/// because a schema change interrupted mid-statement is not safely
/// re-runnable without operator inspection.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open or configure the target database (D001).
    #[error("[D001] Database connection failed: {0}")]
    Connection(String),

    /// A single SQL statement failed (D002). `index` is zero-based file order.
    #[error("[D002] Migration {migration} failed at statement {index}: {message}")]
    Statement {
        migration: String,
        index: usize,
        message: String,
    },

    /// Pre-flight column comparison for a rebuild copy failed (D003).
    #[error("[D003] Schema mismatch in migration {migration} at statement {index}: {message}")]
    SchemaMismatch {
        migration: String,
        index: usize,
        message: String,
    },

    /// The applied-migration ledger could not be written (D004).
    #[error("[D004] Ledger write failed: {0}")]
    LedgerWrite(String),

    /// Foreign-key enforcement was not restored after a migration (D005).
    #[error("[D005] Referential integrity checks disabled after migration {0}; manual inspection required")]
    Consistency(String),

    /// The applied-migration ledger could not be read (D006).
    #[error("[D006] Ledger read failed: {0}")]
    LedgerRead(String),

    /// Transaction management failed (D007).
    #[error("[D007] Transaction failed: {0}")]
    Transaction(String),
}

/// Result type alias for [`DbError`]
pub type DbResult<T> = Result<T, DbError>;
