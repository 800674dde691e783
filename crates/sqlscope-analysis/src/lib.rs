//! Semantic analysis core for SQL query blocks
//!
//! One [`AnalysisTree`] is created per query compilation. It owns the state
//! shared by every nested query block: the [`DescriptorTable`], the
//! [`ConjunctRegistry`] and the [`JoinNullability`] tracker. Each block is
//! analyzed by an [`Analyzer`] scope node that borrows the tree and links to
//! its parent block for name resolution.
//!
//! ```text
//! resolve table ref -> register tuple + aliases -> bind columns to slots
//!     -> register WHERE/ON conjuncts -> planner asks the placement engine
//!        what can be evaluated once a tuple set is materialized
//! ```

mod alias;
mod analyzer;
mod config;
mod conjunct;
mod depth;
mod descriptor;
mod join;
mod placement;
mod report;
mod resolver;
mod state;
mod table_ref;
mod tree;

pub use alias::*;
pub use analyzer::*;
pub use config::*;
pub use conjunct::*;
pub use depth::*;
pub use descriptor::*;
pub use join::*;
pub use placement::*;
pub use report::*;
pub use resolver::*;
pub use state::*;
pub use table_ref::*;
pub use tree::*;
