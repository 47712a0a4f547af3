//! Ordered, fail-fast application of migration scripts.

use crate::error::{MigrateError, MigrateResult};
use crate::history::HistoryStore;
use crate::report::{MigrationPlan, RunReport};
use mg_core::sql_utils::is_blank_script;
use mg_core::{discover_migrations, HistoryTable, MigrationFile};
use mg_db::Database;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Applies every unapplied migration in a directory, in name order.
///
/// The runner owns no connection of its own: the gateway handed to
/// [`new`](Self::new) is shared with its [`HistoryStore`] and used for every
/// check, script, and insert.
pub struct MigrationRunner {
    db: Arc<dyn Database>,
    history: HistoryStore,
}

impl MigrationRunner {
    pub fn new(db: Arc<dyn Database>, table: HistoryTable) -> Self {
        let history = HistoryStore::new(Arc::clone(&db), table);
        Self { db, history }
    }

    /// History store used by this runner
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Apply all unapplied migrations found in `dir`.
    ///
    /// Stops at the first failure. Migrations before the failing one stay
    /// applied and recorded; later ones are not attempted.
    pub async fn run(&self, dir: &Path) -> MigrateResult<RunReport> {
        let start = Instant::now();

        self.history.ensure_initialized().await?;
        let migrations = discover_migrations(dir)?;
        log::debug!(
            "Found {} migration(s) in {}",
            migrations.len(),
            dir.display()
        );

        let mut report = RunReport::default();
        for migration in &migrations {
            if self.history.exists(&migration.name).await? {
                log::debug!("Skipping already applied migration {}", migration.name);
                report.skipped.push(migration.name.clone());
                continue;
            }

            self.apply(migration).await?;
            report.applied.push(migration.name.clone());
        }

        report.elapsed_ms = start.elapsed().as_millis() as u64;
        log::debug!(
            "Applied {} migration(s), skipped {} in {}ms",
            report.applied.len(),
            report.skipped.len(),
            report.elapsed_ms
        );
        Ok(report)
    }

    /// Execute one migration and record it.
    async fn apply(&self, migration: &MigrationFile) -> MigrateResult<()> {
        let sql = migration.read_sql()?;
        log::info!("Running migration {}", migration.name);

        if is_blank_script(&sql, self.db.backend()) {
            log::warn!(
                "Migration {} contains no statements, recording it without executing",
                migration.name
            );
        } else {
            self.db
                .execute_in_transaction(&sql)
                .await
                .map_err(|source| MigrateError::Execution {
                    name: migration.name.clone(),
                    source,
                })?;
        }

        self.history
            .record(&migration.name)
            .await
            .map_err(|e| MigrateError::Recording {
                name: migration.name.clone(),
                table: e.table,
                source: e.source,
            })
    }

    /// Work out which migrations in `dir` a run would apply.
    ///
    /// Reads only: the history table is not created when missing, and no
    /// script is opened.
    pub async fn plan(&self, dir: &Path) -> MigrateResult<MigrationPlan> {
        let migrations = discover_migrations(dir)?;
        let mut plan = MigrationPlan::default();

        if !self.history.is_initialized().await? {
            log::debug!("Migration table {} does not exist yet", self.history.table());
            plan.pending = migrations.into_iter().map(|m| m.name).collect();
            return Ok(plan);
        }

        for migration in migrations {
            if self.history.exists(&migration.name).await? {
                plan.applied.push(migration.name);
            } else {
                plan.pending.push(migration.name);
            }
        }
        Ok(plan)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
