//! Table names as written in a query

use serde::{Deserialize, Serialize};
use std::fmt;

/// A possibly database-qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableName {
    /// Database qualifier, if written
    pub db: Option<String>,
    /// Table name
    pub table: String,
}

impl TableName {
    /// Create a fully qualified name
    pub fn new(db: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            db: Some(db.into()),
            table: table.into(),
        }
    }

    /// Create a name without a database qualifier
    pub fn unqualified(table: impl Into<String>) -> Self {
        Self {
            db: None,
            table: table.into(),
        }
    }

    /// Check if the database qualifier is present
    pub fn is_fully_qualified(&self) -> bool {
        self.db.as_deref().is_some_and(|db| !db.is_empty())
    }

    /// Return a copy qualified with `db`
    pub fn with_db(&self, db: impl Into<String>) -> Self {
        Self::new(db, self.table.clone())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.db {
            Some(db) if !db.is_empty() => write!(f, "{}.{}", db, self.table),
            _ => write!(f, "{}", self.table),
        }
    }
}

impl From<&str> for TableName {
    /// Parse `db.table` or `table`
    fn from(s: &str) -> Self {
        match s.split_once('.') {
            Some((db, table)) => Self::new(db, table),
            None => Self::unqualified(s),
        }
    }
}
