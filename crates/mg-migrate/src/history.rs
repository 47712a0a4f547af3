//! Migration history table.
//!
//! The table is the durable set of applied migration names. Names are always
//! bound as query parameters; only the validated table identifier is spliced
//! into SQL text.

use crate::error::{HistoryOp, StorageError};
use mg_core::{Backend, HistoryTable, MigrationName};
use mg_db::{Database, DbError};
use serde::Serialize;
use std::sync::Arc;

/// Index name used for the unique key on `name` in MySQL.
const UNIQUE_KEY_NAME: &str = "uq_migration_name";

/// One applied migration, as stored in the history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    pub name: MigrationName,
}

/// Record of applied migrations, backed by a table in the target database.
pub struct HistoryStore {
    db: Arc<dyn Database>,
    table: HistoryTable,
}

impl HistoryStore {
    /// Create a store over `table` in `db`. Nothing is touched until
    /// [`ensure_initialized`](Self::ensure_initialized) is called.
    pub fn new(db: Arc<dyn Database>, table: HistoryTable) -> Self {
        Self { db, table }
    }

    /// Table this store reads and writes
    pub fn table(&self) -> &HistoryTable {
        &self.table
    }

    fn backend(&self) -> Backend {
        self.db.backend()
    }

    fn quoted(&self) -> String {
        self.table.quoted(self.backend())
    }

    fn storage_err(&self, operation: HistoryOp) -> impl FnOnce(DbError) -> StorageError + '_ {
        move |source| StorageError {
            table: self.table.to_string(),
            operation,
            source,
        }
    }

    /// Create the table if it is absent and make sure `name` is unique.
    ///
    /// Safe to call on every run. Tables created by older releases without a
    /// unique key on `name` get one added.
    pub async fn ensure_initialized(&self) -> Result<(), StorageError> {
        self.db
            .execute_batch(&self.create_table_sql())
            .await
            .map_err(self.storage_err(HistoryOp::Initialize))?;

        if self.backend() == Backend::MySql && !self.has_unique_name_key().await? {
            log::info!(
                "Adding unique key on 'name' to migration table {}",
                self.table
            );
            let sql = format!(
                "ALTER TABLE {} ADD UNIQUE KEY {} (name)",
                self.quoted(),
                UNIQUE_KEY_NAME
            );
            self.db
                .execute_batch(&sql)
                .await
                .map_err(self.storage_err(HistoryOp::Initialize))?;
        }
        Ok(())
    }

    fn create_table_sql(&self) -> String {
        let table = self.quoted();
        match self.backend() {
            Backend::MySql => format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id INT NOT NULL PRIMARY KEY AUTO_INCREMENT,
                    name VARCHAR(255) NOT NULL,
                    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE KEY {UNIQUE_KEY_NAME} (name)
                )"
            ),
            Backend::DuckDb => {
                let schema = match self.table.schema() {
                    Some(schema) => format!(
                        "CREATE SCHEMA IF NOT EXISTS {};\n",
                        mg_core::sql_utils::quote_ident(schema, Backend::DuckDb)
                    ),
                    None => String::new(),
                };
                format!(
                    "{schema}CREATE TABLE IF NOT EXISTS {table} (
                        name VARCHAR(255) NOT NULL UNIQUE,
                        applied_at TIMESTAMP NOT NULL DEFAULT current_timestamp
                    )"
                )
            }
        }
    }

    /// Whether a single-column unique index on `name` exists (MySQL only).
    async fn has_unique_name_key(&self) -> Result<bool, StorageError> {
        let (schema_filter, params) = self.schema_filter("DATABASE()");
        let sql = format!(
            "SELECT COUNT(*) FROM (
                SELECT index_name FROM information_schema.statistics
                WHERE {schema_filter} AND table_name = ? AND non_unique = 0
                GROUP BY index_name
                HAVING COUNT(*) = 1 AND MAX(column_name) = 'name'
            ) AS unique_name_keys"
        );
        let count = self
            .db
            .query_count(&sql, &params)
            .await
            .map_err(self.storage_err(HistoryOp::Initialize))?;
        Ok(count > 0)
    }

    /// `table_schema` predicate plus its parameters, ending with the table name.
    ///
    /// Unqualified tables live in `default_schema`, which is an SQL expression
    /// (`DATABASE()` on MySQL) or a quoted literal.
    fn schema_filter(&self, default_schema: &str) -> (String, Vec<&str>) {
        match self.table.schema() {
            Some(schema) => ("table_schema = ?".to_string(), vec![schema, self.table.table()]),
            None => (
                format!("table_schema = {}", default_schema),
                vec![self.table.table()],
            ),
        }
    }

    /// Whether the history table exists. Never creates anything.
    pub async fn is_initialized(&self) -> Result<bool, StorageError> {
        let default_schema = match self.backend() {
            Backend::MySql => "DATABASE()",
            Backend::DuckDb => "current_schema()",
        };
        let (schema_filter, params) = self.schema_filter(default_schema);
        let sql = format!(
            "SELECT COUNT(*) FROM information_schema.tables WHERE {schema_filter} AND table_name = ?"
        );
        let count = self
            .db
            .query_count(&sql, &params)
            .await
            .map_err(self.storage_err(HistoryOp::Inspect))?;
        Ok(count > 0)
    }

    /// Whether `name` has been recorded as applied. A failed lookup is an
    /// error, never "not applied".
    pub async fn exists(&self, name: &MigrationName) -> Result<bool, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE name = ?", self.quoted());
        let count = self
            .db
            .query_count(&sql, &[name.as_str()])
            .await
            .map_err(self.storage_err(HistoryOp::Lookup(name.clone())))?;
        Ok(count > 0)
    }

    /// Record `name` as applied. Duplicate names are rejected by the table's
    /// unique key.
    pub async fn record(&self, name: &MigrationName) -> Result<(), StorageError> {
        let sql = format!("INSERT INTO {} (name) VALUES (?)", self.quoted());
        self.db
            .execute_with_params(&sql, &[name.as_str()])
            .await
            .map_err(self.storage_err(HistoryOp::Record(name.clone())))?;
        log::debug!("Recorded migration {} in {}", name, self.table);
        Ok(())
    }

    /// All applied migrations in the order they were recorded.
    pub async fn applied(&self) -> Result<Vec<MigrationRecord>, StorageError> {
        let order = match self.backend() {
            Backend::MySql => "id",
            Backend::DuckDb => "rowid",
        };
        let sql = format!("SELECT name FROM {} ORDER BY {}", self.quoted(), order);
        let rows = self
            .db
            .query(&sql, &[])
            .await
            .map_err(self.storage_err(HistoryOp::List))?;

        let mut records = Vec::with_capacity(rows.len());
        for cell in rows.into_iter().filter_map(|row| row.into_iter().next()) {
            match cell.and_then(MigrationName::try_new) {
                Some(name) => records.push(MigrationRecord { name }),
                None => log::warn!("Ignoring unusable name in migration table {}", self.table),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
