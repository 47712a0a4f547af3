//! CLI argument definitions using clap derive API

use clap::{Parser, ValueEnum};
use mg_core::Backend;
use std::path::PathBuf;

const LONG_ABOUT: &str = "\
mygrator is a small database migrations tool. It looks for .sql files in a \
folder and executes them one by one, in file name order, recording each one \
in a history table in the database. Migrations already recorded are skipped. \
If a migration fails, mygrator stops and reports the migration that failed.

Connection parameters can be given positionally, through MYGRATOR_* \
environment variables, or in a YAML file passed with --config. Command-line \
values win over the file.";

/// mygrator - apply versioned SQL migrations in order, exactly once
#[derive(Parser, Debug)]
#[command(name = "mygrator")]
#[command(author, version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    /// MySQL server host
    #[arg(env = "MYGRATOR_HOST")]
    pub host: Option<String>,

    /// MySQL user
    #[arg(env = "MYGRATOR_USER")]
    pub user: Option<String>,

    /// MySQL password (may be empty)
    #[arg(env = "MYGRATOR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// MySQL schema the migrations run in
    #[arg(env = "MYGRATOR_SCHEMA")]
    pub schema: Option<String>,

    /// MySQL server host (named form of HOST, takes precedence)
    #[arg(long = "host", value_name = "HOST")]
    pub host_opt: Option<String>,

    /// MySQL user (named form of USER, takes precedence)
    #[arg(long = "user", value_name = "USER")]
    pub user_opt: Option<String>,

    /// MySQL password (named form of PASSWORD, takes precedence)
    #[arg(long = "pass", value_name = "PASSWORD")]
    pub pass_opt: Option<String>,

    /// MySQL schema (named form of SCHEMA, takes precedence)
    #[arg(long = "scheme", value_name = "SCHEMA")]
    pub scheme_opt: Option<String>,

    /// Migration folder [default: current directory]
    #[arg(short = 'p', long)]
    pub path: Option<PathBuf>,

    /// Migration history table, optionally schema-qualified [default: __migrations]
    #[arg(short = 't', long)]
    pub table: Option<String>,

    /// MySQL server port [default: 3306]
    #[arg(long)]
    pub port: Option<u16>,

    /// Database backend [default: mysql]
    #[arg(long, value_enum)]
    pub backend: Option<BackendArg>,

    /// DuckDB database file, or :memory: (implies --backend duckdb)
    #[arg(long)]
    pub database: Option<String>,

    /// YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List pending migrations without executing or recording anything
    #[arg(long)]
    pub dry_run: bool,

    /// Summary format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors, and skip the text summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Backend names accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendArg {
    /// MySQL / MariaDB server
    Mysql,
    /// Embedded DuckDB database
    Duckdb,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Mysql => Backend::MySql,
            BackendArg::Duckdb => Backend::DuckDb,
        }
    }
}

/// Summary output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON summary on stdout
    Json,
}

impl Cli {
    /// Host from `--host`, else the positional HOST
    pub fn host(&self) -> Option<&String> {
        self.host_opt.as_ref().or(self.host.as_ref())
    }

    /// User from `--user`, else the positional USER
    pub fn user(&self) -> Option<&String> {
        self.user_opt.as_ref().or(self.user.as_ref())
    }

    /// Password from `--pass`, else the positional PASSWORD
    pub fn password(&self) -> Option<&String> {
        self.pass_opt.as_ref().or(self.password.as_ref())
    }

    /// Schema from `--scheme`, else the positional SCHEMA
    pub fn schema(&self) -> Option<&String> {
        self.scheme_opt.as_ref().or(self.schema.as_ref())
    }

    /// Log level implied by `-v` / `-q`
    pub fn log_level(&self) -> log::LevelFilter {
        if self.verbose {
            log::LevelFilter::Debug
        } else if self.quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        }
    }
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
