//! Database trait definition

use crate::error::{DbError, DbResult};
use async_trait::async_trait;
use mg_core::Backend;

/// A result row with every cell rendered as text (`None` for SQL NULL).
pub type Row = Vec<Option<String>>;

/// Database gateway used by the migration runner and history store.
///
/// Implementations must be Send + Sync for async operation. Parameters are
/// always bound positionally to `?` placeholders, never spliced into SQL.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one or more statements outside an explicit transaction
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a script as a single unit: `BEGIN`, the script, `COMMIT`.
    ///
    /// On any error the transaction is rolled back before returning. Scripts
    /// must not manage transactions themselves.
    async fn execute_in_transaction(&self, sql: &str) -> DbResult<()>;

    /// Execute one parameterized statement, returns affected rows
    async fn execute_with_params(&self, sql: &str, params: &[&str]) -> DbResult<usize>;

    /// Run one parameterized query and return all rows
    async fn query(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Row>>;

    /// Backend this gateway talks to, used to pick SQL dialect details
    fn backend(&self) -> Backend;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;

    /// Run a query whose first cell is a row count (e.g. `SELECT COUNT(*)`)
    async fn query_count(&self, sql: &str, params: &[&str]) -> DbResult<usize> {
        let rows = self.query(sql, params).await?;
        let cell = rows
            .into_iter()
            .next()
            .and_then(|row| row.into_iter().next())
            .flatten()
            .ok_or_else(|| DbError::QueryError(format!("query returned no count: {}", sql)))?;
        cell.trim()
            .parse::<usize>()
            .map_err(|e| DbError::QueryError(format!("expected a count, got '{}': {}", cell, e)))
    }
}
