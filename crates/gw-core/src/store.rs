//! Migration file store
//!
//! Read-only discovery of migration files from a directory. One file per
//! migration, named `<id>_<description>.sql`, applied in ascending id order.

use crate::error::{StoreError, StoreResult};
use crate::migration::Migration;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-backed store of ordered migrations.
pub struct MigrationStore {
    dir: PathBuf,
}

impl MigrationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory this store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Discover all migrations, ordered by id ascending.
    ///
    /// Non-`.sql` entries and subdirectories are ignored. Fails if two
    /// files share an id, a file name is malformed, or a script cannot be
    /// split into statements.
    pub fn list(&self) -> StoreResult<Vec<Migration>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| StoreError::Io {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let mut migrations: Vec<Migration> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io {
                path: self.dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("sql") {
                continue;
            }
            let file_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(n) => n.to_string(),
                None => continue,
            };

            let sql = fs::read_to_string(&path).map_err(|e| StoreError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
            let migration = Migration::from_source(&file_name, &sql)?;
            log::debug!(
                "discovered migration {} ({} statements)",
                migration.label(),
                migration.statements.len()
            );
            migrations.push(migration);
        }

        migrations.sort_by(|a, b| a.id.cmp(&b.id));

        for pair in migrations.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(StoreError::DuplicateId {
                    id: pair[0].id.clone(),
                    first: format!("{}.sql", pair[0].label()),
                    second: format!("{}.sql", pair[1].label()),
                });
            }
        }

        Ok(migrations)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
