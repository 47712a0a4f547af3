//! MySQL database backend implementation
//!
//! Note that MySQL commits implicitly around most DDL statements, so the
//! transaction wrapping in [`Database::execute_in_transaction`] only protects
//! the DML portion of a script.

use crate::error::{DbError, DbResult};
use crate::traits::{Database, Row};
use async_trait::async_trait;
use mg_core::{Backend, MySqlParams};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{MySql, Row as _, ValueRef};

/// MySQL database backend
///
/// Holds a pool capped at a single connection: migrations run strictly one
/// at a time, and the one connection is reused for every check, script and
/// history insert of a run.
pub struct MySqlBackend {
    pool: MySqlPool,
}

impl MySqlBackend {
    /// Connect to the server described by `params`
    pub async fn connect(params: &MySqlParams) -> DbResult<Self> {
        let options = MySqlConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.user)
            .password(&params.password)
            .database(&params.schema);

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                DbError::ConnectionError(format!(
                    "{}@{}:{}/{}: {}",
                    params.user, params.host, params.port, params.schema, e
                ))
            })?;

        log::debug!(
            "Connected to mysql://{}@{}:{}/{}",
            params.user,
            params.host,
            params.port,
            params.schema
        );
        Ok(Self { pool })
    }

    /// Close the pool, waiting for the connection to be returned
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Render one MySQL cell as text, trying the column types mygrator reads.
fn render_cell(row: &MySqlRow, idx: usize) -> DbResult<Option<String>> {
    let raw = row.try_get_raw(idx).map_err(DbError::from)?;
    if raw.is_null() {
        return Ok(None);
    }
    if let Ok(v) = row.try_get::<String, _>(idx) {
        return Ok(Some(v));
    }
    if let Ok(v) = row.try_get::<i64, _>(idx) {
        return Ok(Some(v.to_string()));
    }
    if let Ok(v) = row.try_get::<u64, _>(idx) {
        return Ok(Some(v.to_string()));
    }
    if let Ok(v) = row.try_get::<f64, _>(idx) {
        return Ok(Some(v.to_string()));
    }
    if let Ok(v) = row.try_get::<Vec<u8>, _>(idx) {
        return Ok(Some(String::from_utf8_lossy(&v).into_owned()));
    }
    Err(DbError::QueryError(format!(
        "column {} has a type that cannot be rendered as text",
        idx
    )))
}

#[async_trait]
impl Database for MySqlBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(())
    }

    async fn execute_in_transaction(&self, sql: &str) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        if let Err(e) = sqlx::Executor::execute(&mut *tx, sqlx::raw_sql(sql)).await {
            if let Err(rollback_err) = tx.rollback().await {
                log::warn!("ROLLBACK after failed script also failed: {rollback_err}");
            }
            return Err(DbError::ExecutionError(e.to_string()));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    async fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        let mut query = sqlx::query::<MySql>(sql);
        for param in params {
            query = query.bind(param.to_string());
        }
        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
        Ok(result.rows_affected() as usize)
    }

    async fn query(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Row>> {
        let mut query = sqlx::query::<MySql>(sql);
        for param in params {
            query = query.bind(param.to_string());
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DbError::QueryError(format!("{}: {}", e, sql)))?;

        rows.iter()
            .map(|row| {
                (0..row.len())
                    .map(|idx| render_cell(row, idx))
                    .collect::<DbResult<Row>>()
            })
            .collect()
    }

    fn backend(&self) -> Backend {
        Backend::MySql
    }

    fn db_type(&self) -> &'static str {
        "mysql"
    }
}

#[cfg(test)]
#[path = "mysql_test.rs"]
mod tests;
