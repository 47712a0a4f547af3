//! mg-migrate - Migration runner for mygrator
//!
//! Tracks applied migrations in a history table and applies pending ones
//! strictly in name order, stopping at the first failure.

pub mod error;
pub mod history;
pub mod report;
pub mod runner;

pub use error::{ErrorKind, HistoryOp, MigrateError, MigrateResult, StorageError};
pub use history::{HistoryStore, MigrationRecord};
pub use report::{MigrationPlan, RunReport};
pub use runner::MigrationRunner;
