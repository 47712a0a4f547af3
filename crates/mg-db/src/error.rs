//! Error types for mg-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Query error (D003)
    #[error("[D003] SQL query failed: {0}")]
    QueryError(String),

    /// BEGIN / COMMIT / ROLLBACK failure (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Internal error (D006)
    #[error("[D006] Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Whether this error indicates a bug or corrupted process state rather
    /// than a problem with the database or the SQL sent to it.
    pub fn is_internal(&self) -> bool {
        matches!(self, DbError::MutexPoisoned(_) | DbError::Internal(_))
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(_)
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => DbError::ConnectionError(err.to_string()),
            sqlx::Error::WorkerCrashed => DbError::Internal(err.to_string()),
            sqlx::Error::Database(db_err) => DbError::ExecutionError(db_err.to_string()),
            other => DbError::ExecutionError(other.to_string()),
        }
    }
}
