use super::*;
use std::fs;
use tempfile::tempdir;

fn names(migrations: &[MigrationFile]) -> Vec<&str> {
    migrations.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn test_discover_orders_by_file_name() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("003_third.sql"), "SELECT 3;").unwrap();
    fs::write(dir.path().join("001_first.sql"), "SELECT 1;").unwrap();
    fs::write(dir.path().join("002_second.sql"), "SELECT 2;").unwrap();

    let migrations = discover_migrations(dir.path()).unwrap();

    assert_eq!(names(&migrations), vec!["001_first", "002_second", "003_third"]);
}

#[test]
fn test_discover_ordering_is_lexicographic_not_numeric() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("10_b.sql"), "").unwrap();
    fs::write(dir.path().join("9_a.sql"), "").unwrap();

    let migrations = discover_migrations(dir.path()).unwrap();

    assert_eq!(names(&migrations), vec!["10_b", "9_a"]);
}

#[test]
fn test_discover_skips_non_sql_files_and_directories() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("001_init.sql"), "CREATE TABLE t (id INT);").unwrap();
    fs::write(dir.path().join("README.md"), "# notes").unwrap();
    fs::write(dir.path().join("002_draft.sql.bak"), "SELECT 1;").unwrap();
    fs::write(dir.path().join("003_upper.SQL"), "SELECT 1;").unwrap();
    fs::write(dir.path().join(".sql"), "SELECT 1;").unwrap();
    fs::create_dir(dir.path().join("004_dir.sql")).unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("nested").join("005_nested.sql"), "SELECT 1;").unwrap();

    let migrations = discover_migrations(dir.path()).unwrap();

    assert_eq!(names(&migrations), vec!["001_init"]);
}

#[test]
fn test_discover_strips_only_final_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("2024.01.01_add_users.sql"), "").unwrap();

    let migrations = discover_migrations(dir.path()).unwrap();

    assert_eq!(names(&migrations), vec!["2024.01.01_add_users"]);
}

#[test]
fn test_discover_empty_directory() {
    let dir = tempdir().unwrap();
    let migrations = discover_migrations(dir.path()).unwrap();
    assert!(migrations.is_empty());
}

#[test]
fn test_discover_missing_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does_not_exist");

    let err = discover_migrations(&missing).unwrap_err();

    assert!(matches!(err, CoreError::MigrationDirNotFound { .. }));
    assert!(err.to_string().contains("does_not_exist"));
}

#[test]
fn test_discover_path_is_a_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("001_init.sql");
    fs::write(&file, "").unwrap();

    let err = discover_migrations(&file).unwrap_err();

    assert!(matches!(err, CoreError::MigrationDirNotFound { .. }));
}

#[test]
fn test_discover_rejects_overlong_name() {
    let dir = tempdir().unwrap();
    let long = format!("{}.sql", "a".repeat(MigrationName::MAX_LEN + 1));
    fs::write(dir.path().join(long), "").unwrap();

    let err = discover_migrations(dir.path()).unwrap_err();

    assert!(matches!(err, CoreError::InvalidMigrationName { .. }));
}

#[test]
fn test_read_sql_returns_content_verbatim() {
    let dir = tempdir().unwrap();
    let content = "-- header\nCREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\n";
    fs::write(dir.path().join("001_init.sql"), content).unwrap();

    let migrations = discover_migrations(dir.path()).unwrap();

    assert_eq!(migrations[0].read_sql().unwrap(), content);
}

#[test]
fn test_read_sql_missing_file() {
    let dir = tempdir().unwrap();
    let migration = MigrationFile {
        name: MigrationName::new("001_gone"),
        source_path: dir.path().join("001_gone.sql"),
    };

    let err = migration.read_sql().unwrap_err();

    assert!(matches!(err, CoreError::IoWithPath { .. }));
    assert!(err.to_string().contains("001_gone.sql"));
}

#[test]
fn test_ensure_migration_dir() {
    let dir = tempdir().unwrap();
    assert!(ensure_migration_dir(dir.path()).is_ok());
    assert!(ensure_migration_dir(&dir.path().join("nope")).is_err());
}
