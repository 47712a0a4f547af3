//! Validated identifier for the migration history table.

use crate::config::Backend;
use crate::error::{CoreError, CoreResult};
use crate::sql_utils::quote_qualified;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the table that records applied migrations.
///
/// Table names cannot be bound as query parameters, so the name is restricted
/// to one or two dot-separated parts, each matching `[A-Za-z_][A-Za-z0-9_$]*`
/// and at most 64 bytes long. Anything else is rejected at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HistoryTable {
    schema: Option<String>,
    table: String,
}

impl HistoryTable {
    /// Default history table name.
    pub const DEFAULT: &'static str = "__migrations";

    /// Longest identifier part accepted by MySQL.
    const MAX_PART_LEN: usize = 64;

    /// Parse and validate a (possibly schema-qualified) table name.
    pub fn parse(name: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidHistoryTable {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = name.split('.').collect();
        if parts.len() > 2 {
            return Err(invalid("expected 'table' or 'schema.table'"));
        }
        for part in &parts {
            validate_part(part).map_err(invalid)?;
        }

        let (schema, table) = match parts.as_slice() {
            [table] => (None, table.to_string()),
            [schema, table] => (Some(schema.to_string()), table.to_string()),
            _ => return Err(invalid("expected 'table' or 'schema.table'")),
        };
        Ok(Self { schema, table })
    }

    /// Schema qualifier, if one was given.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Unqualified table name.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Quoted, possibly qualified, name ready to splice into SQL for `backend`.
    pub fn quoted(&self, backend: Backend) -> String {
        quote_qualified(&self.to_string(), backend)
    }
}

fn validate_part(part: &str) -> Result<(), &'static str> {
    if part.is_empty() {
        return Err("identifier parts must not be empty");
    }
    if part.len() > HistoryTable::MAX_PART_LEN {
        return Err("identifier parts must not exceed 64 bytes");
    }
    let mut chars = part.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if !first_ok {
        return Err("identifiers must start with a letter or underscore");
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err("identifiers may only contain letters, digits, '_' and '$'");
    }
    Ok(())
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self {
            schema: None,
            table: Self::DEFAULT.to_string(),
        }
    }
}

impl fmt::Display for HistoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{}.{}", schema, self.table),
            None => f.write_str(&self.table),
        }
    }
}

impl TryFrom<String> for HistoryTable {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<HistoryTable> for String {
    fn from(table: HistoryTable) -> Self {
        table.to_string()
    }
}
