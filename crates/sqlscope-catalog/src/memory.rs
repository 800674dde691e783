//! In-memory catalog

use crate::{CatalogProvider, Database, Table, TableState};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Catalog mutation error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Database already exists: {0}")]
    DatabaseExists(String),

    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    #[error("Table not found: {database}.{table}")]
    TableNotFound { database: String, table: String },
}

/// Thread-safe in-memory catalog
///
/// Clones share the same underlying databases.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    databases: Arc<RwLock<IndexMap<String, Arc<Database>>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Create an empty database
    pub fn create_database(&self, name: &str) -> Result<(), CatalogError> {
        let mut databases = self.databases.write();
        if databases.contains_key(name) {
            return Err(CatalogError::DatabaseExists(name.to_string()));
        }
        let db = Database::new(self.allocate_id(), name);
        databases.insert(name.to_string(), Arc::new(db));
        log::debug!("Created database {}", name);
        Ok(())
    }

    /// Add a table to an existing database, replacing any table of that name
    pub fn add_table(&self, database: &str, table: Table) -> Result<(), CatalogError> {
        let mut databases = self.databases.write();
        let db = databases
            .get_mut(database)
            .ok_or_else(|| CatalogError::DatabaseNotFound(database.to_string()))?;
        log::debug!("Added table {}.{}", database, table.name);
        Arc::make_mut(db).put_table(table);
        Ok(())
    }

    /// Change the state of a table
    pub fn set_table_state(
        &self,
        database: &str,
        table: &str,
        state: TableState,
    ) -> Result<(), CatalogError> {
        let mut databases = self.databases.write();
        let db = databases
            .get_mut(database)
            .ok_or_else(|| CatalogError::DatabaseNotFound(database.to_string()))?;
        let current = db.table(table).ok_or_else(|| CatalogError::TableNotFound {
            database: database.to_string(),
            table: table.to_string(),
        })?;
        let updated = Table::clone(&current).with_state(state);
        Arc::make_mut(db).put_table(updated);
        log::debug!("Table {}.{} is now {}", database, table, state);
        Ok(())
    }

    /// Database names in creation order
    pub fn database_names(&self) -> Vec<String> {
        self.databases.read().keys().cloned().collect()
    }
}

impl CatalogProvider for MemoryCatalog {
    fn database(&self, name: &str) -> Option<Arc<Database>> {
        self.databases.read().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Column, ColumnType};

    fn catalog() -> MemoryCatalog {
        let catalog = MemoryCatalog::new();
        catalog.create_database("db1").unwrap();
        catalog
            .add_table(
                "db1",
                Table::new(1, "orders", vec![Column::new("id", ColumnType::BigInt)]),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_lookup() {
        let catalog = catalog();
        let db = catalog.database("db1").unwrap();
        assert!(db.table("orders").is_some());
        assert!(catalog.database("db2").is_none());
        assert_eq!(catalog.database_names(), vec!["db1".to_string()]);
    }

    #[test]
    fn test_errors() {
        let catalog = catalog();
        assert_eq!(
            catalog.create_database("db1"),
            Err(CatalogError::DatabaseExists("db1".into()))
        );
        assert_eq!(
            catalog.add_table("nope", Table::new(2, "t", Vec::new())),
            Err(CatalogError::DatabaseNotFound("nope".into()))
        );
        assert!(matches!(
            catalog.set_table_state("db1", "missing", TableState::Restoring),
            Err(CatalogError::TableNotFound { .. })
        ));
    }

    #[test]
    fn test_state_change_does_not_affect_held_snapshots() {
        let catalog = catalog();
        let before = catalog.database("db1").unwrap();

        catalog
            .set_table_state("db1", "orders", TableState::Restoring)
            .unwrap();

        assert_eq!(before.table("orders").unwrap().state, TableState::Normal);
        let after = catalog.database("db1").unwrap();
        assert_eq!(after.table("orders").unwrap().state, TableState::Restoring);
    }

    #[test]
    fn test_clones_share_state() {
        let catalog = catalog();
        let other = catalog.clone();
        other.create_database("db2").unwrap();
        assert!(catalog.database("db2").is_some());
    }
}
