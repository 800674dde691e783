mod common;

use common::{catalog, orders_table, tree};
use mockall::mock;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sqlscope::catalog::Database;
use sqlscope::prelude::*;
use std::sync::Arc;

mock! {
    pub Catalog {}

    impl CatalogProvider for Catalog {
        fn database(&self, name: &str) -> Option<Arc<Database>>;
    }
}

fn session() -> Arc<Session> {
    Arc::new(Session::new("analyst").with_database("db1"))
}

#[test]
fn test_qualified_and_bare_names_share_a_tuple() {
    let tree = tree();
    let mut block = tree.root();
    let tuple = block
        .analyze_table_ref(TableRef::new("orders"), CallDepth::root())
        .unwrap();

    assert_eq!(block.lookup_alias("orders"), Ok(tuple));
    assert_eq!(block.lookup_alias("db1.orders"), Ok(tuple));
    assert_eq!(
        tree.tuple(tuple).unwrap().aliases(),
        &["db1.orders".to_string(), "orders".to_string()]
    );
    assert_eq!(
        block.analyze_table_ref(TableRef::new("db1.orders"), CallDepth::root()),
        Err(AnalysisError::duplicate_alias("db1.orders"))
    );
}

#[test]
fn test_same_table_name_in_two_databases_is_ambiguous() {
    let tree = tree();
    let mut block = tree.root();
    let first = block
        .analyze_table_ref(TableRef::new("orders"), CallDepth::root())
        .unwrap();
    let second = block
        .analyze_table_ref(TableRef::new("db2.orders"), CallDepth::root())
        .unwrap();

    assert_ne!(first, second);
    assert_eq!(
        block.lookup_alias("orders"),
        Err(AnalysisError::ambiguous_alias("orders"))
    );
    assert_eq!(block.lookup_alias("db1.orders"), Ok(first));
    assert_eq!(block.lookup_alias("db2.orders"), Ok(second));
    assert!(matches!(
        block.register_column_ref(&ColumnRef::new(Some("orders"), "id")),
        Err(AnalysisError::AmbiguousAlias { .. })
    ));
}

#[test]
fn test_explicit_alias_hides_implicit_name() {
    let tree = tree();
    let mut block = tree.root();
    let o = block
        .analyze_table_ref(TableRef::new("orders").with_alias("o"), CallDepth::root())
        .unwrap();

    assert_eq!(block.lookup_alias("o"), Ok(o));
    assert_eq!(
        block.lookup_alias("orders"),
        Err(AnalysisError::unknown_alias("orders"))
    );
    assert_eq!(
        block.analyze_table_ref(TableRef::new("customers").with_alias("o"), CallDepth::root()),
        Err(AnalysisError::duplicate_alias("o"))
    );
    assert_eq!(block.tuple_ids(), vec![o]);
}

#[test]
fn test_same_alias_in_nested_block() {
    let tree = tree();
    let mut outer = tree.root();
    let o = outer
        .analyze_table_ref(TableRef::new("orders").with_alias("x"), CallDepth::root())
        .unwrap();

    let mut inner = outer.child();
    let c = inner
        .analyze_table_ref(TableRef::new("customers").with_alias("x"), CallDepth::root())
        .unwrap();

    assert_eq!(inner.lookup_alias("x"), Ok(c));
    assert_eq!(outer.lookup_alias("x"), Ok(o));
}

#[rstest]
#[case("archive", AnalysisError::table_state("archive", "RESTORE"))]
#[case("missing", AnalysisError::unknown_table("missing"))]
#[case("db9.orders", AnalysisError::unknown_database("db9"))]
fn test_resolution_errors(#[case] name: &str, #[case] expected: AnalysisError) {
    let tree = tree();
    let mut block = tree.root();
    assert_eq!(
        block.analyze_table_ref(TableRef::new(name), CallDepth::root()),
        Err(expected)
    );
    assert_eq!(tree.descriptors().tuple_count(), 0);
}

#[test]
fn test_restored_table_becomes_queryable() {
    let catalog = catalog();
    catalog
        .set_table_state("db1", "archive", TableState::Normal)
        .unwrap();
    let tree = AnalysisTree::new(Arc::new(catalog), session(), AnalyzerConfig::default()).unwrap();

    let mut block = tree.root();
    assert!(block
        .analyze_table_ref(TableRef::new("archive"), CallDepth::root())
        .is_ok());
}

#[test]
fn test_no_default_database() {
    let tree = AnalysisTree::new(
        Arc::new(catalog()),
        Arc::new(Session::new("analyst")),
        AnalyzerConfig::default(),
    )
    .unwrap();
    let mut block = tree.root();

    assert_eq!(
        block.analyze_table_ref(TableRef::new("orders"), CallDepth::root()),
        Err(AnalysisError::NoDefaultDatabase)
    );
    assert!(block
        .analyze_table_ref(TableRef::new("db1.orders"), CallDepth::root())
        .is_ok());
}

#[test]
fn test_resolved_ref_skips_catalog() {
    let mut catalog = MockCatalog::new();
    catalog.expect_database().never();
    let tree = AnalysisTree::new(Arc::new(catalog), session(), AnalyzerConfig::default()).unwrap();

    let mut block = tree.root();
    let table_ref = TableRef::resolved(TableName::new("db1", "orders"), Arc::new(orders_table(1)));
    let tuple = block.analyze_table_ref(table_ref, CallDepth::root()).unwrap();

    assert_eq!(block.lookup_alias("orders"), Ok(tuple));
}

#[test]
fn test_resolution_uses_session_database() {
    let mut catalog = MockCatalog::new();
    catalog
        .expect_database()
        .withf(|name: &str| name == "db1")
        .times(1)
        .returning(|name| {
            let mut db = Database::new(1, name);
            db.put_table(orders_table(1));
            Some(Arc::new(db))
        });
    let tree = AnalysisTree::new(Arc::new(catalog), session(), AnalyzerConfig::default()).unwrap();

    let block = tree.root();
    let resolved = block.resolve_table_ref(TableRef::new("orders")).unwrap();
    assert_eq!(
        resolved.resolution().map(|r| r.name.to_string()),
        Some("db1.orders".to_string())
    );
}

#[test]
fn test_column_resolution_across_blocks() {
    let tree = tree();
    let mut outer = tree.root();
    let o = outer
        .analyze_table_ref(TableRef::new("orders").with_alias("o"), CallDepth::root())
        .unwrap();

    let mut inner = outer.child();
    let c = inner
        .analyze_table_ref(TableRef::new("customers"), CallDepth::root())
        .unwrap();

    let name = inner.register_column_ref(&ColumnRef::new(None, "name")).unwrap();
    let status = inner.register_column_ref(&ColumnRef::new(None, "status")).unwrap();
    assert_eq!(name.parent(), c);
    assert_eq!(status.parent(), o);

    // `id` exists in customers, so the inner block wins
    let id = inner.register_column_ref(&ColumnRef::new(None, "id")).unwrap();
    assert_eq!(id.parent(), c);
    assert_eq!(
        inner.register_column_ref(&ColumnRef::new(None, "nope")),
        Err(AnalysisError::unknown_column("field list", "nope"))
    );
}

#[test]
fn test_session_helpers() {
    let tree = common::tree_with(AnalyzerConfig::default().with_explain(true));
    let block = tree.root();

    assert_eq!(block.default_database(), Some("db1".to_string()));
    assert_eq!(block.default_catalog(), "internal");
    assert_eq!(block.qualified_user(), "analyst");
    assert_eq!(block.timezone(), "Asia/Shanghai");
    assert!(block.is_explain());
    assert_eq!(
        block.fq_table_name(&TableName::from("orders")),
        TableName::new("db1", "orders")
    );
}
