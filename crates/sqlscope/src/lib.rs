//! Semantic analysis of SQL query blocks
//!
//! This crate bundles the pieces a query compiler needs between parsing and
//! planning:
//! - Table reference resolution against a catalog and session
//! - Tuple and slot descriptors for every row source and column reference
//! - Alias scoping across nested query blocks
//! - Conjunct registration and predicate placement under outer and semi joins
//! - Statistics collection jobs
//!
//! # Example
//!
//! ```ignore
//! use sqlscope::prelude::*;
//!
//! let tree = AnalysisTree::new(catalog, session, AnalyzerConfig::default())?;
//! let mut block = tree.root();
//! let a = block.analyze_table_ref(TableRef::new("a"), CallDepth::root())?;
//! ```

// Re-export all public APIs from internal crates
pub use sqlscope_analysis as analysis;
pub use sqlscope_ast as ast;
pub use sqlscope_catalog as catalog;
pub use sqlscope_diagnostics as diagnostics;
pub use sqlscope_stats as stats;

// Convenience re-exports
pub use sqlscope_analysis::{AnalysisTree, Analyzer, AnalyzerConfig};
pub use sqlscope_diagnostics::{AnalysisError, Result};

/// Types most callers need
pub mod prelude {
    pub use sqlscope_analysis::{
        AnalysisTree, Analyzer, AnalyzerConfig, CallDepth, Conjunct, JoinClause, TableRef,
    };
    pub use sqlscope_ast::{
        ColumnRef, ConjunctId, Expr, JoinOperator, Literal, SlotId, TableName, TupleId,
    };
    pub use sqlscope_catalog::{
        CatalogProvider, Column, ColumnType, MemoryCatalog, Session, SessionContext, Table,
        TableState,
    };
    pub use sqlscope_diagnostics::{AnalysisError, ErrorCode, Result};
}
