//! Table name resolution against local views and the catalog

use crate::TableRef;
use indexmap::IndexMap;
use sqlscope_ast::TableName;
use sqlscope_catalog::{CatalogProvider, SessionContext, Table};
use sqlscope_diagnostics::{AnalysisError, Result};
use std::sync::Arc;

/// Resolves table refs of one block
pub struct TableResolver<'a> {
    catalog: &'a dyn CatalogProvider,
    session: &'a dyn SessionContext,
    local_views: &'a IndexMap<String, Arc<Table>>,
}

impl<'a> TableResolver<'a> {
    pub fn new(
        catalog: &'a dyn CatalogProvider,
        session: &'a dyn SessionContext,
        local_views: &'a IndexMap<String, Arc<Table>>,
    ) -> Self {
        Self {
            catalog,
            session,
            local_views,
        }
    }

    /// Qualify `name` with the session database when it has none
    pub fn fq_table_name(&self, name: &TableName) -> TableName {
        if name.is_fully_qualified() {
            return name.clone();
        }
        TableName {
            db: self.session.current_database(),
            table: name.table.clone(),
        }
    }

    /// Resolve a table ref to a concrete table
    ///
    /// Checks in order: already resolved, a local view of this block for an
    /// unqualified name, then the catalog. Fails if no database applies, the
    /// database or table is unknown, or the table is being restored.
    pub fn resolve(&self, table_ref: TableRef) -> Result<TableRef> {
        if table_ref.is_resolved() {
            return Ok(table_ref);
        }

        let name = table_ref.name.clone();
        if !name.is_fully_qualified() {
            if let Some(view) = self.local_views.get(&name.table) {
                log::debug!("{} resolved to local view", name);
                let view = Arc::clone(view);
                return Ok(table_ref.resolve_to(TableName::unqualified(&name.table), view));
            }
        }

        let db_name = match &name.db {
            Some(db) if !db.is_empty() => db.clone(),
            _ => self
                .session
                .current_database()
                .ok_or(AnalysisError::NoDefaultDatabase)?,
        };

        let database = self
            .catalog
            .database(&db_name)
            .ok_or_else(|| AnalysisError::unknown_database(&db_name))?;
        let table = database
            .table(&name.table)
            .ok_or_else(|| AnalysisError::unknown_table(&name.table))?;

        if !table.is_queryable() {
            return Err(AnalysisError::table_state(&table.name, table.state.to_string()));
        }

        let fq_name = TableName::new(database.name.clone(), table.name.clone());
        log::debug!("{} resolved to {}", name, fq_name);
        Ok(table_ref.resolve_to(fq_name, table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sqlscope_catalog::{MemoryCatalog, Session, TableState};

    fn catalog() -> MemoryCatalog {
        let catalog = MemoryCatalog::new();
        catalog.create_database("db1").unwrap();
        catalog.add_table("db1", Table::new(1, "orders", Vec::new())).unwrap();
        catalog
            .add_table(
                "db1",
                Table::new(2, "archive", Vec::new()).with_state(TableState::RestoringWithLoad),
            )
            .unwrap();
        catalog
    }

    #[rstest]
    #[case("orders", Some("db1"), Ok("db1.orders"))]
    #[case("db1.orders", None, Ok("db1.orders"))]
    #[case("orders", None, Err(AnalysisError::NoDefaultDatabase))]
    #[case("db9.orders", None, Err(AnalysisError::unknown_database("db9")))]
    #[case("missing", Some("db1"), Err(AnalysisError::unknown_table("missing")))]
    #[case(
        "db1.archive",
        None,
        Err(AnalysisError::table_state("archive", "RESTORE_WITH_LOAD"))
    )]
    fn test_resolve(
        #[case] name: &str,
        #[case] database: Option<&str>,
        #[case] expected: std::result::Result<&str, AnalysisError>,
    ) {
        let catalog = catalog();
        let mut session = Session::new("root");
        if let Some(db) = database {
            session = session.with_database(db);
        }
        let views = IndexMap::new();
        let resolver = TableResolver::new(&catalog, &session, &views);

        let result = resolver
            .resolve(TableRef::new(name))
            .map(|r| r.resolution().unwrap().name.to_string());
        assert_eq!(result, expected.map(str::to_string));
    }

    #[test]
    fn test_local_view_shadows_catalog() {
        let catalog = catalog();
        let session = Session::new("root").with_database("db1");
        let view = Arc::new(Table::view(99, "orders", Vec::new()));
        let views = IndexMap::from([("orders".to_string(), Arc::clone(&view))]);
        let resolver = TableResolver::new(&catalog, &session, &views);

        let resolved = resolver.resolve(TableRef::new("orders")).unwrap();
        assert_eq!(resolved.table().map(|t| t.id), Some(99));

        let qualified = resolver.resolve(TableRef::new("db1.orders")).unwrap();
        assert_eq!(qualified.table().map(|t| t.id), Some(1));
    }

    #[test]
    fn test_fq_table_name() {
        let catalog = catalog();
        let session = Session::new("root").with_database("db1");
        let views = IndexMap::new();
        let resolver = TableResolver::new(&catalog, &session, &views);

        assert_eq!(
            resolver.fq_table_name(&TableName::unqualified("t")),
            TableName::new("db1", "t")
        );
        assert_eq!(
            resolver.fq_table_name(&TableName::new("db2", "t")),
            TableName::new("db2", "t")
        );
    }
}
