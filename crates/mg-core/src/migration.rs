//! Migration file discovery

use crate::error::{CoreError, CoreResult};
use crate::migration_name::MigrationName;
use std::path::{Path, PathBuf};

/// Extension (without the dot) that marks a file as a migration.
pub const MIGRATION_EXTENSION: &str = "sql";

/// A migration script found on disk.
///
/// The SQL itself is read lazily with [`read_sql`](Self::read_sql) so that
/// already-applied migrations are never opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Canonical name (file stem), the key recorded in the history table
    pub name: MigrationName,

    /// Path of the script, used for reading and diagnostics
    pub source_path: PathBuf,
}

impl MigrationFile {
    /// Read the full script verbatim.
    pub fn read_sql(&self) -> CoreResult<String> {
        std::fs::read_to_string(&self.source_path).map_err(|e| CoreError::IoWithPath {
            path: self.source_path.display().to_string(),
            source: e,
        })
    }
}

/// Fail with [`CoreError::MigrationDirNotFound`] unless `dir` is an existing
/// directory.
pub fn ensure_migration_dir(dir: &Path) -> CoreResult<()> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(CoreError::MigrationDirNotFound {
            path: dir.display().to_string(),
        })
    }
}

/// Discover migration files directly inside `dir` (non-recursive).
///
/// Only regular files with a `.sql` extension (case-sensitive) are
/// migrations. The result is ordered lexicographically by file name, which is
/// the order migrations are applied in.
pub fn discover_migrations(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    ensure_migration_dir(dir)?;

    let io_err = |e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    };

    let mut found: Vec<(String, MigrationFile)> = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        let path = entry.path();
        if path.is_dir() {
            log::debug!("Skipping directory {}", path.display());
            continue;
        }
        if !path.extension().is_some_and(|e| e == MIGRATION_EXTENSION) {
            log::debug!("Skipping non-migration file {}", path.display());
            continue;
        }

        let file_name = file_name_str(&path)?;
        let name = migration_name_for(&path)?;
        found.push((
            file_name,
            MigrationFile {
                name,
                source_path: path,
            },
        ));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(found.into_iter().map(|(_, migration)| migration).collect())
}

fn file_name_str(path: &Path) -> CoreResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| CoreError::InvalidMigrationName {
            path: path.display().to_string(),
            reason: "file name is not valid UTF-8".to_string(),
        })
}

/// Derive the migration name by stripping the final extension.
fn migration_name_for(path: &Path) -> CoreResult<MigrationName> {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    MigrationName::try_from(stem).map_err(|reason| CoreError::InvalidMigrationName {
        path: path.display().to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
