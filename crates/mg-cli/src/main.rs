//! mygrator CLI - apply versioned SQL migrations to MySQL or DuckDB

use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::common::{exit_code_for, render_error, ExitCode};
use commands::migrate;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let code = match migrate::execute(&cli).await {
        Ok(()) => 0,
        Err(err) => {
            // ExitCode errors have already been reported
            if err.downcast_ref::<ExitCode>().is_none() {
                eprintln!("Error: {}", render_error(&err));
            }
            exit_code_for(&err)
        }
    };
    std::process::ExitCode::from(code as u8)
}

/// Install env_logger at the level implied by `-v` / `-q`; `RUST_LOG` wins.
fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}
