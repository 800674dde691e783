mod common;

use common::{tree, tree_with};
use pretty_assertions::assert_eq;
use sqlscope::prelude::*;

/// Open one nested block per level, each reading `orders`
fn descend(block: &Analyzer<'_>, depth: CallDepth, levels: usize) -> Result<usize> {
    let mut child = block.child();
    let depth = child.enter(depth)?;
    let table_ref = child.resolve_table_ref(TableRef::new("orders"))?;
    child.register_table_ref(table_ref)?;
    if levels == 1 {
        return Ok(depth.get());
    }
    descend(&child, depth, levels - 1)
}

#[test]
fn test_nesting_past_limit_fails() {
    let tree = tree();
    let root = tree.root();

    let result = descend(&root, CallDepth::root(), 200);

    assert_eq!(result, Err(AnalysisError::MaxRecursion { limit: 128 }));
    assert_eq!(tree.descriptors().tuple_count(), 128);
}

#[test]
fn test_nesting_within_limit() {
    let tree = tree();
    let root = tree.root();

    assert_eq!(descend(&root, CallDepth::root(), 128), Ok(128));
    assert_eq!(tree.descriptors().tuple_count(), 128);
}

#[test]
fn test_limit_comes_from_config() {
    let tree = tree_with(AnalyzerConfig::default().with_max_call_depth(4));
    let root = tree.root();

    assert_eq!(
        descend(&root, CallDepth::root(), 10),
        Err(AnalysisError::MaxRecursion { limit: 4 })
    );
    assert_eq!(tree.descriptors().tuple_count(), 4);
}

#[test]
fn test_deep_expression_hits_limit() {
    let tree = tree_with(AnalyzerConfig::default().with_max_call_depth(16));
    let mut block = tree.root();
    block.analyze_table_ref(TableRef::new("orders"), CallDepth::root()).unwrap();

    let mut expr = Expr::gt(Expr::col("amount"), Expr::int(0));
    for _ in 0..20 {
        expr = Expr::not(expr);
    }

    assert_eq!(
        block.register_where_clause(expr, CallDepth::root()),
        Err(AnalysisError::MaxRecursion { limit: 16 })
    );
    assert!(tree.conjuncts().is_empty());
}
