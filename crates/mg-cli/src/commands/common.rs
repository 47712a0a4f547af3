//! Shared utilities for CLI commands

use mg_core::CoreError;
use mg_db::DbError;
use mg_migrate::{ErrorKind, MigrateError};
use std::fmt;

/// Process status for expected failures: bad config, missing folder,
/// unreadable script, history table trouble, or a failed migration.
pub(crate) const EXIT_FAILURE: i32 = 1;

/// Process status for bugs and anything unclassified.
pub(crate) const EXIT_INTERNAL: i32 = 2;

/// Process status when a migration ran but was not recorded.
pub(crate) const EXIT_UNRECORDED: i32 = 3;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` once the failure has been reported,
/// so that destructors run and the connection is released.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only, never shown to the user
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Pick the process status for an error that reached `main`.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
        return *code;
    }
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<MigrateError>() {
            return migrate_exit_code(e);
        }
        if let Some(e) = cause.downcast_ref::<DbError>() {
            return if e.is_internal() {
                EXIT_INTERNAL
            } else {
                EXIT_FAILURE
            };
        }
        if cause.downcast_ref::<CoreError>().is_some() {
            return EXIT_FAILURE;
        }
    }
    EXIT_INTERNAL
}

/// Process status for a failed run.
pub(crate) fn migrate_exit_code(err: &MigrateError) -> i32 {
    if err.kind() == ErrorKind::Recording {
        EXIT_UNRECORDED
    } else if err.is_internal() {
        EXIT_INTERNAL
    } else {
        EXIT_FAILURE
    }
}

/// Render an error and its causes on one line.
///
/// Coded errors already embed their source in the message, so causes whose
/// text is already present are left out.
pub(crate) fn render_error(err: &anyhow::Error) -> String {
    let mut out = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if text.is_empty() || out.contains(&text) {
            continue;
        }
        if !out.is_empty() {
            out.push_str(": ");
        }
        out.push_str(&text);
    }
    out
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
