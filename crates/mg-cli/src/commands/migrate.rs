//! Migrate command implementation

use anyhow::{Context, Result};
use mg_core::ensure_migration_dir;
use mg_migrate::{MigrateError, MigrationPlan, MigrationRunner, RunReport};

use crate::cli::{Cli, OutputFormat};
use crate::commands::common::{migrate_exit_code, ExitCode};
use crate::context::{resolve_config, RuntimeContext};

/// Execute a migration run (or a dry run with `--dry-run`).
pub async fn execute(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;

    // Fail on a missing folder before any connection attempt
    let dir = config.migrations_path().to_path_buf();
    ensure_migration_dir(&dir).map_err(MigrateError::from)?;

    let ctx = RuntimeContext::connect(config).await?;
    log::debug!(
        "Migrating {} from {} using table {}",
        ctx.target,
        dir.display(),
        ctx.config.history_table()
    );
    let runner = MigrationRunner::new(ctx.db(), ctx.config.history_table().clone());

    let outcome = if cli.dry_run {
        runner.plan(&dir).await.map(Outcome::Plan)
    } else {
        runner.run(&dir).await.map(Outcome::Run)
    };
    drop(runner);
    ctx.close().await;

    match outcome {
        Ok(outcome) => outcome.print(cli),
        Err(err) => {
            let code = migrate_exit_code(&err);
            eprintln!("Error: {}", err);
            Err(ExitCode(code).into())
        }
    }
}

enum Outcome {
    Run(RunReport),
    Plan(MigrationPlan),
}

impl Outcome {
    fn print(&self, cli: &Cli) -> Result<()> {
        match cli.output {
            OutputFormat::Json => {
                let json = match self {
                    Outcome::Run(report) => serde_json::to_string_pretty(report),
                    Outcome::Plan(plan) => serde_json::to_string_pretty(plan),
                }
                .context("Failed to serialize summary")?;
                println!("{}", json);
            }
            OutputFormat::Text if cli.quiet => {}
            OutputFormat::Text => match self {
                Outcome::Run(report) => print_run(report),
                Outcome::Plan(plan) => print_plan(plan),
            },
        }
        Ok(())
    }
}

fn print_run(report: &RunReport) {
    if report.is_noop() {
        println!(
            "Nothing to migrate, {} migration(s) already applied",
            report.skipped.len()
        );
    } else {
        println!(
            "Applied {} migration(s) in {}ms ({} already applied)",
            report.applied.len(),
            report.elapsed_ms,
            report.skipped.len()
        );
    }
}

fn print_plan(plan: &MigrationPlan) {
    if plan.pending.is_empty() {
        println!(
            "No pending migrations, {} already applied",
            plan.applied.len()
        );
        return;
    }
    println!("Pending migrations ({}):", plan.pending.len());
    for name in &plan.pending {
        println!("  {}", name);
    }
}
