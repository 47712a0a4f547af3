//! Configuration types and parsing for mygrator.yml
//!
//! Every value can also come from the command line; the CLI loads the file
//! (when given) and overlays its own arguments before calling
//! [`Config::connection_target`] and [`Config::history_table`].

use crate::error::{CoreError, CoreResult};
use crate::history_table::HistoryTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Database backend a run targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Backend {
    /// MySQL / MariaDB server
    #[default]
    #[serde(rename = "mysql")]
    MySql,
    /// Embedded DuckDB database (file or `:memory:`)
    #[serde(rename = "duckdb")]
    DuckDb,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::MySql => write!(f, "mysql"),
            Backend::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Top-level configuration from mygrator.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Database connection settings
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Migration discovery and history settings
    #[serde(default)]
    pub migrations: MigrationsConfig,
}

/// Raw connection settings; validated by [`Config::connection_target`].
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionConfig {
    /// Which backend to connect to
    #[serde(default)]
    pub backend: Backend,

    /// MySQL server host
    #[serde(default)]
    pub host: Option<String>,

    /// MySQL server port (default 3306)
    #[serde(default)]
    pub port: Option<u16>,

    /// MySQL user
    #[serde(default)]
    pub user: Option<String>,

    /// MySQL password (may be empty, but must be given)
    #[serde(default)]
    pub password: Option<String>,

    /// MySQL schema (database) the migrations run in
    #[serde(default)]
    pub schema: Option<String>,

    /// DuckDB database file, or `:memory:`
    #[serde(default)]
    pub path: Option<String>,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("schema", &self.schema)
            .field("path", &self.path)
            .finish()
    }
}

/// Where migrations live and where their history is kept
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationsConfig {
    /// Directory containing `.sql` migration files
    #[serde(default = "default_migrations_path")]
    pub path: PathBuf,

    /// History table name
    #[serde(default)]
    pub table: HistoryTable,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            path: default_migrations_path(),
            table: HistoryTable::default(),
        }
    }
}

fn default_migrations_path() -> PathBuf {
    PathBuf::from(".")
}

/// Validated MySQL connection parameters
#[derive(Clone, PartialEq, Eq)]
pub struct MySqlParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub schema: String,
}

impl MySqlParams {
    /// Default MySQL port
    pub const DEFAULT_PORT: u16 = 3306;
}

impl fmt::Debug for MySqlParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlParams")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .finish()
    }
}

/// A fully validated connection target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// MySQL server
    MySql(MySqlParams),
    /// DuckDB database at `path`
    DuckDb { path: String },
}

impl ConnectionTarget {
    /// Backend this target connects to
    pub fn backend(&self) -> Backend {
        match self {
            ConnectionTarget::MySql(_) => Backend::MySql,
            ConnectionTarget::DuckDb { .. } => Backend::DuckDb,
        }
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionTarget::MySql(p) => {
                write!(f, "mysql://{}@{}:{}/{}", p.user, p.host, p.port, p.schema)
            }
            ConnectionTarget::DuckDb { path } => write!(f, "duckdb:{}", path),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
            message: e.to_string(),
        })
    }

    /// History table configured for this run
    pub fn history_table(&self) -> &HistoryTable {
        &self.migrations.table
    }

    /// Migration directory configured for this run
    pub fn migrations_path(&self) -> &Path {
        &self.migrations.path
    }

    /// Validate the connection settings for the selected backend.
    ///
    /// MySQL requires `host`, `user`, `password` and `schema`; all but the
    /// password must be non-empty. DuckDB requires `path`.
    pub fn connection_target(&self) -> CoreResult<ConnectionTarget> {
        let conn = &self.connection;
        match conn.backend {
            Backend::MySql => {
                let host = required_non_empty(Backend::MySql, "host", &conn.host)?;
                let user = required_non_empty(Backend::MySql, "user", &conn.user)?;
                let password = conn
                    .password
                    .clone()
                    .ok_or_else(|| missing(Backend::MySql, "password"))?;
                let schema = required_non_empty(Backend::MySql, "schema", &conn.schema)?;
                let port = conn.port.unwrap_or(MySqlParams::DEFAULT_PORT);
                if port == 0 {
                    return Err(CoreError::ConfigInvalid {
                        message: "port must be between 1 and 65535".to_string(),
                    });
                }
                Ok(ConnectionTarget::MySql(MySqlParams {
                    host,
                    port,
                    user,
                    password,
                    schema,
                }))
            }
            Backend::DuckDb => {
                let path = required_non_empty(Backend::DuckDb, "path", &conn.path)?;
                Ok(ConnectionTarget::DuckDb { path })
            }
        }
    }
}

fn missing(backend: Backend, param: &str) -> CoreError {
    CoreError::MissingConnectionParam {
        backend: backend.to_string(),
        param: param.to_string(),
    }
}

fn required_non_empty(
    backend: Backend,
    param: &str,
    value: &Option<String>,
) -> CoreResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(missing(backend, param)),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
