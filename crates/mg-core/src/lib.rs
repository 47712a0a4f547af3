//! mg-core - Core library for mygrator
//!
//! This crate provides the shared types used across all mygrator components:
//! migration names, migration file discovery, history table identifiers,
//! identifier quoting, and configuration loading.

pub mod config;
pub mod error;
pub mod history_table;
pub mod migration;
pub mod migration_name;
pub mod sql_utils;

pub use config::{Backend, Config, ConnectionConfig, ConnectionTarget, MigrationsConfig, MySqlParams};
pub use error::{CoreError, CoreResult};
pub use history_table::HistoryTable;
pub use migration::{discover_migrations, ensure_migration_dir, MigrationFile};
pub use migration_name::MigrationName;
