//! Collaborator traits the analysis core depends on

use crate::Database;
use std::sync::Arc;

/// Read-only catalog lookups
///
/// Lookups are synchronous and may be slow; the analyzer never caches across
/// analysis trees.
pub trait CatalogProvider: Send + Sync {
    /// Get a database by name
    fn database(&self, name: &str) -> Option<Arc<Database>>;
}

/// Session state of the connection issuing the query
pub trait SessionContext: Send + Sync {
    /// The current database, if one is selected
    fn current_database(&self) -> Option<String>;

    /// The current catalog
    fn current_catalog(&self) -> String;

    /// The authenticated user
    fn current_user(&self) -> String;
}

/// Plain session context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub database: Option<String>,
    pub catalog: String,
    pub user: String,
}

impl Session {
    /// Create a session on the internal catalog for `user`
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            database: None,
            catalog: "internal".to_string(),
            user: user.into(),
        }
    }

    /// Select a current database
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = catalog.into();
        self
    }
}

impl SessionContext for Session {
    fn current_database(&self) -> Option<String> {
        self.database.clone().filter(|db| !db.is_empty())
    }

    fn current_catalog(&self) -> String {
        self.catalog.clone()
    }

    fn current_user(&self) -> String {
        self.user.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let session = Session::new("root");
        assert_eq!(session.current_database(), None);
        assert_eq!(session.current_catalog(), "internal");
        assert_eq!(session.current_user(), "root");

        let session = session.with_database("db1").with_catalog("hive");
        assert_eq!(session.current_database().as_deref(), Some("db1"));
        assert_eq!(session.current_catalog(), "hive");
    }

    #[test]
    fn test_empty_database_counts_as_unset() {
        let session = Session::new("root").with_database("");
        assert_eq!(session.current_database(), None);
    }
}
