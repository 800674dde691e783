//! Databases

use crate::Table;
use indexmap::IndexMap;
use std::sync::Arc;

/// A database and its tables
#[derive(Debug, Clone)]
pub struct Database {
    pub id: u64,
    pub name: String,
    tables: IndexMap<String, Arc<Table>>,
}

impl Database {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tables: IndexMap::new(),
        }
    }

    /// Look up a table by exact name
    pub fn table(&self, name: &str) -> Option<Arc<Table>> {
        self.tables.get(name).cloned()
    }

    /// Insert or replace a table, returning the previous one
    pub fn put_table(&mut self, table: Table) -> Option<Arc<Table>> {
        self.tables.insert(table.name.clone(), Arc::new(table))
    }

    /// Table names in insertion order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
