//! New command implementation - scaffolds the next numbered migration file

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::Path;

use crate::cli::{GlobalArgs, NewArgs};

/// Execute the new command
pub(crate) fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    // Migration slugs become file names and ledger ids; keep them boring.
    if args.description.is_empty()
        || !args
            .description
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        anyhow::bail!(
            "Invalid description '{}': use lowercase letters, digits, and underscores",
            args.description
        );
    }

    let dir = Path::new(&global.dir);
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let next_id = next_sequence_id(dir)?;
    let file_name = format!("{next_id:04}_{}.sql", args.description);
    let path = dir.join(&file_name);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    let header = format!(
        "-- Migration: {next_id:04}_{description}\n\
         -- Created: {date}\n\
         -- Apply with: gw apply --db <database> --dir {dir}\n\
         --\n\
         -- Statements run in file order. Use IF NOT EXISTS idioms so a\n\
         -- partially applied migration can be retried safely.\n\n",
        description = args.description,
        date = Utc::now().format("%Y-%m-%d"),
        dir = global.dir,
    );
    fs::write(&path, header).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {}", path.display());
    Ok(())
}

/// One past the highest numeric id prefix present in `dir`, or 1.
fn next_sequence_id(dir: &Path) -> Result<u32> {
    let mut max_id = 0u32;
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(stem) = name.strip_suffix(".sql") else {
            continue;
        };
        if let Some((id, _)) = stem.split_once('_') {
            if let Ok(id) = id.parse::<u32>() {
                max_id = max_id.max(id);
            }
        }
    }
    Ok(max_id + 1)
}

#[cfg(test)]
#[path = "new_test.rs"]
mod tests;
