//! The migration unit

use crate::error::{StoreError, StoreResult};
use crate::script;

/// A single versioned schema migration.
///
/// Built from a file named `<id>_<description>.sql` where `<id>` is a
/// zero-padded decimal sequence number. Ids sort lexically, so all ids in
/// one directory should share the same width. Immutable once authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// Zero-padded sequence id, e.g. `0002`
    pub id: String,
    /// Human-readable slug taken from the file name, e.g. `widen_trade_status`
    pub description: String,
    /// Executable SQL statements in file order, comments stripped
    pub statements: Vec<String>,
}

impl Migration {
    /// Parse a migration from a file name and its raw SQL source.
    pub fn from_source(file_name: &str, sql: &str) -> StoreResult<Self> {
        let (id, description) = split_file_name(file_name)?;
        let statements = script::split_statements(file_name, sql)?;
        if statements.is_empty() {
            return Err(StoreError::EmptyMigration {
                name: file_name.to_string(),
            });
        }
        Ok(Self {
            id,
            description,
            statements,
        })
    }

    /// `<id>_<description>` label used in logs and error messages.
    pub fn label(&self) -> String {
        format!("{}_{}", self.id, self.description)
    }
}

/// Split `0002_widen_trade_status.sql` into `("0002", "widen_trade_status")`.
fn split_file_name(file_name: &str) -> StoreResult<(String, String)> {
    let invalid = || StoreError::InvalidFileName {
        name: file_name.to_string(),
    };

    let stem = file_name.strip_suffix(".sql").ok_or_else(invalid)?;
    let (id, description) = stem.split_once('_').ok_or_else(invalid)?;
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if description.is_empty() {
        return Err(invalid());
    }
    Ok((id.to_string(), description.to_string()))
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
