use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the whole argument definition: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_positional_connection_params() {
    let cli = Cli::try_parse_from([
        "mygrator", "db.local", "deploy", "s3cret", "app", "-p", "migrations", "-t", "history",
    ])
    .unwrap();

    assert_eq!(cli.host.as_deref(), Some("db.local"));
    assert_eq!(cli.user.as_deref(), Some("deploy"));
    assert_eq!(cli.password.as_deref(), Some("s3cret"));
    assert_eq!(cli.schema.as_deref(), Some("app"));
    assert_eq!(cli.path, Some(PathBuf::from("migrations")));
    assert_eq!(cli.table.as_deref(), Some("history"));
    assert!(!cli.dry_run);
    assert_eq!(cli.output, OutputFormat::Text);
}

#[test]
fn test_empty_password_is_accepted() {
    let cli = Cli::try_parse_from(["mygrator", "localhost", "root", "", "app"]).unwrap();
    assert_eq!(cli.password.as_deref(), Some(""));
}

#[test]
fn test_duckdb_flags() {
    let cli = Cli::try_parse_from([
        "mygrator",
        "--backend",
        "duckdb",
        "--database",
        "app.duckdb",
        "--dry-run",
        "-o",
        "json",
    ])
    .unwrap();

    assert_eq!(cli.backend, Some(BackendArg::Duckdb));
    assert_eq!(cli.database.as_deref(), Some("app.duckdb"));
    assert!(cli.dry_run);
    assert_eq!(cli.output, OutputFormat::Json);
    assert_eq!(Backend::from(BackendArg::Duckdb), Backend::DuckDb);
}

#[test]
fn test_unknown_backend_is_rejected() {
    assert!(Cli::try_parse_from(["mygrator", "--backend", "oracle"]).is_err());
}

#[test]
fn test_verbose_and_quiet_conflict() {
    assert!(Cli::try_parse_from(["mygrator", "-v", "-q"]).is_err());
}

#[test]
fn test_log_level() {
    let cli = Cli::try_parse_from(["mygrator"]).unwrap();
    assert_eq!(cli.log_level(), log::LevelFilter::Info);

    let cli = Cli::try_parse_from(["mygrator", "-v"]).unwrap();
    assert_eq!(cli.log_level(), log::LevelFilter::Debug);

    let cli = Cli::try_parse_from(["mygrator", "-q"]).unwrap();
    assert_eq!(cli.log_level(), log::LevelFilter::Warn);
}

#[test]
fn test_named_connection_flags() {
    let cli = Cli::try_parse_from([
        "mygrator",
        "--host",
        "db.local",
        "--user",
        "deploy",
        "--pass",
        "s3cret",
        "--scheme",
        "app",
        "--path",
        "migrations",
    ])
    .unwrap();

    assert!(cli.host.is_none());
    assert_eq!(cli.host().map(String::as_str), Some("db.local"));
    assert_eq!(cli.user().map(String::as_str), Some("deploy"));
    assert_eq!(cli.password().map(String::as_str), Some("s3cret"));
    assert_eq!(cli.schema().map(String::as_str), Some("app"));
    assert_eq!(cli.path, Some(PathBuf::from("migrations")));
}

#[test]
fn test_named_flags_win_over_positionals() {
    let cli = Cli::try_parse_from([
        "mygrator", "old-host", "old-user", "old-pass", "old-schema", "--host", "new-host",
        "--scheme", "new-schema",
    ])
    .unwrap();

    assert_eq!(cli.host().map(String::as_str), Some("new-host"));
    assert_eq!(cli.user().map(String::as_str), Some("old-user"));
    assert_eq!(cli.password().map(String::as_str), Some("old-pass"));
    assert_eq!(cli.schema().map(String::as_str), Some("new-schema"));
}
