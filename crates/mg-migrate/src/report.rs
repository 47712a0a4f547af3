//! Run summaries

use mg_core::MigrationName;
use serde::Serialize;

/// Outcome of a successful [`MigrationRunner::run`](crate::MigrationRunner::run).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Migrations executed and recorded by this run, in order
    pub applied: Vec<MigrationName>,

    /// Migrations found already recorded and left alone
    pub skipped: Vec<MigrationName>,

    /// Wall-clock duration of the run in milliseconds
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Whether this run changed nothing
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// What a run would do, computed without executing or recording anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationPlan {
    /// Migrations already recorded
    pub applied: Vec<MigrationName>,

    /// Migrations a run would execute, in order
    pub pending: Vec<MigrationName>,
}
