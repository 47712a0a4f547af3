//! SQL identifier quoting utilities
//!
//! The history table name is the only identifier mygrator splices into SQL
//! text (values are always bound as parameters). It is validated by
//! [`HistoryTable`](crate::HistoryTable) and then quoted here for the
//! target dialect.

use crate::config::Backend;

/// Quote a SQL identifier for the given backend.
///
/// MySQL uses backticks, DuckDB uses standard double quotes. Embedded quote
/// characters are escaped by doubling them.
///
/// # Examples
/// ```
/// use mg_core::sql_utils::quote_ident;
/// use mg_core::Backend;
/// assert_eq!(quote_ident("users", Backend::MySql), "`users`");
/// assert_eq!(quote_ident("users", Backend::DuckDb), r#""users""#);
/// ```
pub fn quote_ident(ident: &str, backend: Backend) -> String {
    match backend {
        Backend::MySql => format!("`{}`", ident.replace('`', "``")),
        Backend::DuckDb => format!("\"{}\"", ident.replace('"', "\"\"")),
    }
}

/// Quote a potentially schema-qualified name (e.g. `schema.table`).
///
/// Splits on `.` and individually quotes each component.
///
/// # Examples
/// ```
/// use mg_core::sql_utils::quote_qualified;
/// use mg_core::Backend;
/// assert_eq!(quote_qualified("app.__migrations", Backend::MySql), "`app`.`__migrations`");
/// ```
pub fn quote_qualified(name: &str, backend: Backend) -> String {
    name.split('.')
        .map(|part| quote_ident(part, backend))
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether a script holds nothing the database would run or reject, only
/// whitespace and comments.
///
/// Comment rules follow the target dialect:
/// - `--` starts a line comment; MySQL requires whitespace (or end of
///   input) after the dashes.
/// - `#` starts a line comment on MySQL only.
/// - `/* ... */` is a block comment. MySQL executes `/*! ... */` bodies, so
///   those count as statements.
///
/// An unterminated block comment is not blank: the database reports it.
/// String literals are not inspected.
pub fn is_blank_script(sql: &str, backend: Backend) -> bool {
    let mut rest = sql;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return true;
        }
        if is_line_comment(rest, backend) {
            match rest.find('\n') {
                Some(pos) => rest = &rest[pos + 1..],
                None => return true,
            }
        } else if let Some(body) = rest.strip_prefix("/*") {
            if backend == Backend::MySql && body.starts_with('!') {
                return false;
            }
            match body.find("*/") {
                Some(pos) => rest = &body[pos + 2..],
                None => return false,
            }
        } else {
            return false;
        }
    }
}

fn is_line_comment(sql: &str, backend: Backend) -> bool {
    match backend {
        Backend::MySql => {
            sql.starts_with('#')
                || sql
                    .strip_prefix("--")
                    .is_some_and(|after| after.chars().next().map_or(true, char::is_whitespace))
        }
        Backend::DuckDb => sql.starts_with("--"),
    }
}
