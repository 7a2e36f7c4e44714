//! Error types for gw-core

use thiserror::Error;

/// Discovery and parsing errors for the migration file store
#[derive(Error, Debug)]
pub enum StoreError {
    /// S001: Two migration files share the same id prefix
    #[error("[S001] Duplicate migration id '{id}': {first} and {second}")]
    DuplicateId {
        id: String,
        first: String,
        second: String,
    },

    /// S002: File name does not follow the `<id>_<description>.sql` convention
    #[error("[S002] Invalid migration file name '{name}': expected <id>_<description>.sql with a numeric id")]
    InvalidFileName { name: String },

    /// S003: Statement boundaries could not be determined
    #[error("[S003] Malformed script in '{name}': {message}")]
    MalformedScript { name: String, message: String },

    /// S004: Directory or file could not be read
    #[error("[S004] Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// S005: Migration file contains no executable statements
    #[error("[S005] Migration '{name}' contains no statements")]
    EmptyMigration { name: String },
}

/// Result type alias for [`StoreError`]
pub type StoreResult<T> = Result<T, StoreError>;
