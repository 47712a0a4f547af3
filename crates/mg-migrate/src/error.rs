//! Error types for the migration runner.

use mg_core::{CoreError, MigrationName};
use mg_db::DbError;
use std::fmt;
use thiserror::Error;

/// History-table operation that was in progress when storage failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryOp {
    /// Creating the table or its unique key
    Initialize,
    /// Checking whether the table exists
    Inspect,
    /// Checking whether a migration was applied
    Lookup(MigrationName),
    /// Inserting a migration record
    Record(MigrationName),
    /// Listing applied migrations
    List,
}

impl fmt::Display for HistoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryOp::Initialize => write!(f, "creating the table"),
            HistoryOp::Inspect => write!(f, "checking whether the table exists"),
            HistoryOp::Lookup(name) => write!(f, "checking whether '{}' was applied", name),
            HistoryOp::Record(name) => write!(f, "recording '{}'", name),
            HistoryOp::List => write!(f, "listing applied migrations"),
        }
    }
}

/// The history table could not be created, read, or written.
#[derive(Error, Debug)]
#[error("[M003] Migration table '{table}' failed while {operation}: {source}")]
pub struct StorageError {
    pub table: String,
    pub operation: HistoryOp,
    pub source: DbError,
}

/// Broad category of a run failure, used to pick the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Io,
    Storage,
    Execution,
    Recording,
}

/// Migration run errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Migration directory does not exist (M001).
    #[error("[M001] Migration folder not found: {path}")]
    NotFound { path: String },

    /// Migration directory or script could not be read (M002).
    #[error("[M002] {0}")]
    Io(CoreError),

    /// History table unavailable (M003).
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A migration's SQL failed and was rolled back (M004).
    #[error("[M004] Migration '{name}' failed and was rolled back; later migrations were not attempted: {source}")]
    Execution { name: MigrationName, source: DbError },

    /// A migration was applied but its history row could not be written (M005).
    #[error("[M005] Migration '{name}' was applied but could not be recorded in '{table}': {source}. Insert '{name}' into '{table}' by hand before re-running, otherwise it will be applied again")]
    Recording {
        name: MigrationName,
        table: String,
        source: DbError,
    },
}

impl MigrateError {
    /// Category of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            MigrateError::NotFound { .. } => ErrorKind::NotFound,
            MigrateError::Io(_) => ErrorKind::Io,
            MigrateError::Storage(_) => ErrorKind::Storage,
            MigrateError::Execution { .. } => ErrorKind::Execution,
            MigrateError::Recording { .. } => ErrorKind::Recording,
        }
    }

    /// Whether the failure points at a bug rather than at the environment
    pub fn is_internal(&self) -> bool {
        match self {
            MigrateError::Storage(e) => e.source.is_internal(),
            MigrateError::Execution { source, .. } | MigrateError::Recording { source, .. } => {
                source.is_internal()
            }
            MigrateError::NotFound { .. } | MigrateError::Io(_) => false,
        }
    }
}

impl From<CoreError> for MigrateError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MigrationDirNotFound { path } => MigrateError::NotFound { path },
            other => MigrateError::Io(other),
        }
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_not_found_maps_to_not_found() {
        let err: MigrateError = CoreError::MigrationDirNotFound {
            path: "migrations".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "[M001] Migration folder not found: migrations");
    }

    #[test]
    fn test_core_io_maps_to_io() {
        let err: MigrateError = CoreError::IoWithPath {
            path: "001.sql".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("001.sql"));
    }

    #[test]
    fn test_recording_message_names_remediation() {
        let err = MigrateError::Recording {
            name: MigrationName::new("002_users"),
            table: "__migrations".to_string(),
            source: DbError::ExecutionError("lost connection".to_string()),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("[M005]"));
        assert!(msg.contains("002_users"));
        assert!(msg.contains("by hand"));
        assert_eq!(err.kind(), ErrorKind::Recording);
    }

    #[test]
    fn test_storage_message_names_operation() {
        let err = MigrateError::from(StorageError {
            table: "__migrations".to_string(),
            operation: HistoryOp::Lookup(MigrationName::new("001_init")),
            source: DbError::QueryError("timeout".to_string()),
        });
        let msg = err.to_string();
        assert!(msg.starts_with("[M003]"));
        assert!(msg.contains("checking whether '001_init' was applied"));
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_internal_classification_follows_source() {
        let err = MigrateError::Execution {
            name: MigrationName::new("001_init"),
            source: DbError::MutexPoisoned("poisoned".to_string()),
        };
        assert!(err.is_internal());

        let err = MigrateError::Execution {
            name: MigrationName::new("001_init"),
            source: DbError::ExecutionError("syntax".to_string()),
        };
        assert!(!err.is_internal());
    }
}
