//! Shared fixtures for the integration tests
//!
//! `db1` holds `orders`, `customers`, `items` and a table mid-restore;
//! `db2` holds a second `orders` so that the bare name can become ambiguous.

#![allow(dead_code)]

use sqlscope::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

pub fn orders_table(id: u64) -> Table {
    Table::new(
        id,
        "orders",
        vec![
            Column::new("id", ColumnType::BigInt).not_null(),
            Column::new("customer_id", ColumnType::BigInt).not_null(),
            Column::new("status", ColumnType::Varchar),
            Column::new("amount", ColumnType::Decimal),
        ],
    )
}

pub fn catalog() -> MemoryCatalog {
    let catalog = MemoryCatalog::new();
    catalog.create_database("db1").unwrap();
    catalog.create_database("db2").unwrap();

    catalog.add_table("db1", orders_table(1)).unwrap();
    catalog
        .add_table(
            "db1",
            Table::new(
                2,
                "customers",
                vec![
                    Column::new("id", ColumnType::BigInt).not_null(),
                    Column::new("name", ColumnType::Varchar),
                ],
            ),
        )
        .unwrap();
    catalog
        .add_table(
            "db1",
            Table::new(
                3,
                "items",
                vec![
                    Column::new("order_id", ColumnType::BigInt).not_null(),
                    Column::new("sku", ColumnType::Varchar),
                ],
            ),
        )
        .unwrap();
    catalog
        .add_table(
            "db1",
            Table::new(4, "archive", vec![Column::new("id", ColumnType::BigInt)])
                .with_state(TableState::Restoring),
        )
        .unwrap();
    catalog.add_table("db2", orders_table(5)).unwrap();
    catalog
}

pub fn tree_with(config: AnalyzerConfig) -> AnalysisTree {
    AnalysisTree::new(
        Arc::new(catalog()),
        Arc::new(Session::new("analyst").with_database("db1")),
        config,
    )
    .unwrap()
}

pub fn tree() -> AnalysisTree {
    tree_with(AnalyzerConfig::default())
}

pub fn tuples(ids: &[TupleId]) -> BTreeSet<TupleId> {
    ids.iter().copied().collect()
}
