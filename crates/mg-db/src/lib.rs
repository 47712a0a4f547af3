//! mg-db - Database abstraction layer for mygrator
//!
//! This crate provides the `Database` trait the migration runner executes
//! through, with a MySQL implementation (the production target) and a DuckDB
//! implementation (embedded databases and tests).

pub mod duckdb;
pub mod error;
pub mod mysql;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use mysql::MySqlBackend;
pub use traits::{Database, Row};
