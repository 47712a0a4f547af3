//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Row};
use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{params_from_iter, Connection};
use mg_core::Backend;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Execute `sql` between `BEGIN` and `COMMIT`, rolling back on error
    fn execute_in_transaction_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        if let Err(e) = conn.execute_batch(sql) {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                log::warn!("ROLLBACK after failed script also failed: {rollback_err}");
            }
            return Err(DbError::ExecutionError(e.to_string()));
        }

        if let Err(commit_err) = conn.execute_batch("COMMIT") {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
                log::warn!("ROLLBACK after failed COMMIT also failed: {rollback_err}");
            }
            return Err(DbError::TransactionError(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        Ok(())
    }

    /// Execute a parameterized statement synchronously
    fn execute_with_params_sync(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, params_from_iter(params.iter()))
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Run a parameterized query synchronously
    fn query_sync(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let query_err = |e: duckdb::Error| DbError::QueryError(format!("{}: {}", e, sql));

        let mut stmt = conn.prepare(sql).map_err(query_err)?;
        let mut rows = stmt.query(params_from_iter(params.iter())).map_err(query_err)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(query_err)? {
            let width = row.as_ref().column_count();
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                let value: Value = row.get(idx).map_err(query_err)?;
                cells.push(render_value(value));
            }
            out.push(cells);
        }
        Ok(out)
    }
}

/// Render a DuckDB value as text.
fn render_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Boolean(v) => Some(v.to_string()),
        Value::TinyInt(v) => Some(v.to_string()),
        Value::SmallInt(v) => Some(v.to_string()),
        Value::Int(v) => Some(v.to_string()),
        Value::BigInt(v) => Some(v.to_string()),
        Value::HugeInt(v) => Some(v.to_string()),
        Value::UTinyInt(v) => Some(v.to_string()),
        Value::USmallInt(v) => Some(v.to_string()),
        Value::UInt(v) => Some(v.to_string()),
        Value::UBigInt(v) => Some(v.to_string()),
        Value::Float(v) => Some(v.to_string()),
        Value::Double(v) => Some(v.to_string()),
        Value::Text(v) => Some(v),
        Value::Blob(v) => Some(String::from_utf8_lossy(&v).into_owned()),
        other => Some(format!("{:?}", other)),
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn execute_in_transaction(&self, sql: &str) -> DbResult<()> {
        self.execute_in_transaction_sync(sql)
    }

    async fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        self.execute_with_params_sync(sql, params)
    }

    async fn query(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Row>> {
        self.query_sync(sql, params)
    }

    fn backend(&self) -> Backend {
        Backend::DuckDb
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
