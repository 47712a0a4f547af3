//! Runtime context for a migration run

use anyhow::{Context, Result};
use mg_core::{Backend, Config, ConnectionTarget, HistoryTable};
use mg_db::{Database, DuckDbBackend, MySqlBackend};
use std::sync::Arc;

use crate::cli::Cli;

/// Load the config file (if any) and overlay command-line values.
///
/// `--database` selects DuckDB unless `--backend` says otherwise. The named
/// `--host`/`--user`/`--pass`/`--scheme` flags win over positional values.
pub fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => Config::default(),
    };

    let conn = &mut config.connection;
    if let Some(backend) = cli.backend {
        conn.backend = backend.into();
    } else if cli.database.is_some() {
        conn.backend = Backend::DuckDb;
    }
    overlay(&mut conn.host, cli.host());
    overlay(&mut conn.user, cli.user());
    overlay(&mut conn.password, cli.password());
    overlay(&mut conn.schema, cli.schema());
    overlay(&mut conn.path, cli.database.as_ref());
    if cli.port.is_some() {
        conn.port = cli.port;
    }

    if let Some(path) = &cli.path {
        config.migrations.path = path.clone();
    }
    if let Some(table) = &cli.table {
        config.migrations.table = HistoryTable::parse(table)?;
    }

    Ok(config)
}

fn overlay(slot: &mut Option<String>, value: Option<&String>) {
    if let Some(value) = value {
        *slot = Some(value.clone());
    }
}

/// Open database connection plus the configuration it was made from
pub struct RuntimeContext {
    pub config: Config,
    pub target: ConnectionTarget,
    db: Arc<dyn Database>,
    mysql: Option<Arc<MySqlBackend>>,
}

impl RuntimeContext {
    /// Validate connection settings and connect.
    pub async fn connect(config: Config) -> Result<Self> {
        let target = config.connection_target()?;
        log::debug!("Connecting to {}", target);

        let (db, mysql) = match &target {
            ConnectionTarget::MySql(params) => {
                let backend = Arc::new(MySqlBackend::connect(params).await?);
                (Arc::clone(&backend) as Arc<dyn Database>, Some(backend))
            }
            ConnectionTarget::DuckDb { path } => {
                let backend = DuckDbBackend::new(path)?;
                (Arc::new(backend) as Arc<dyn Database>, None)
            }
        };

        Ok(Self {
            config,
            target,
            db,
            mysql,
        })
    }

    /// Shared database handle
    pub fn db(&self) -> Arc<dyn Database> {
        Arc::clone(&self.db)
    }

    /// Release the connection
    pub async fn close(self) {
        if let Some(mysql) = &self.mysql {
            mysql.close().await;
        }
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
