//! Error types for mg-core

use thiserror::Error;

/// Core error type for mygrator
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: A connection parameter required by the selected backend is missing
    #[error("[E004] Missing required connection parameter '{param}' for {backend} backend")]
    MissingConnectionParam { backend: String, param: String },

    /// E005: History table identifier is not a plain (optionally qualified) identifier
    #[error("[E005] Invalid migration table name '{name}': {reason}")]
    InvalidHistoryTable { name: String, reason: String },

    /// E006: Migration directory does not exist
    #[error("[E006] Migration folder not found: {path}")]
    MigrationDirNotFound { path: String },

    /// E007: Migration file name cannot be used as a migration name
    #[error("[E007] Invalid migration file '{path}': {reason}")]
    InvalidMigrationName { path: String, reason: String },

    /// E008: IO error with file path context
    #[error("[E008] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

impl CoreError {
    /// Whether this error stems from invalid or incomplete configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CoreError::ConfigNotFound { .. }
                | CoreError::ConfigParseError { .. }
                | CoreError::ConfigInvalid { .. }
                | CoreError::MissingConnectionParam { .. }
                | CoreError::InvalidHistoryTable { .. }
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
