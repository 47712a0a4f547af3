//! Strongly-typed migration name wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Strongly-typed wrapper for migration names.
///
/// A migration name is the migration file name with its final extension
/// stripped (`001_init.sql` -> `001_init`). It is the sole key of the
/// history table, so it must be non-empty and fit the `VARCHAR(255)` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MigrationName(String);

impl MigrationName {
    /// Maximum length in bytes, matching the history table's `name` column.
    pub const MAX_LEN: usize = 255;

    /// Create a new `MigrationName`, panicking if the name is empty or too long.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        match Self::try_from(name) {
            Ok(name) => name,
            Err(reason) => panic!("invalid MigrationName: {reason}"),
        }
    }

    /// Try to create a new `MigrationName`, returning `None` if it is empty
    /// or longer than [`MAX_LEN`](Self::MAX_LEN).
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let name: String = name.into();
        Self::try_from(name).ok()
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MigrationName {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s.is_empty() {
            Err("migration name must not be empty")
        } else if s.len() > Self::MAX_LEN {
            Err("migration name must not exceed 255 bytes")
        } else {
            Ok(Self(s))
        }
    }
}

impl TryFrom<&str> for MigrationName {
    type Error = &'static str;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_from(s.to_string())
    }
}

impl From<MigrationName> for String {
    fn from(name: MigrationName) -> Self {
        name.0
    }
}

impl fmt::Display for MigrationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MigrationName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for MigrationName {
    fn eq(&self, other: &String) -> bool {
        self.0 == *other
    }
}
