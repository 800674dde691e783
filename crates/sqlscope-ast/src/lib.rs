//! Syntax-level building blocks shared by the sqlscope analysis crates
//!
//! This crate defines the identities handed out during analysis (tuples,
//! slots, conjuncts, scopes), the predicate expression tree, literals,
//! operators, table names and join operators. It carries no analysis state.

mod expr;
mod ids;
mod join;
mod literal;
mod operator;
mod table_name;

pub use expr::*;
pub use ids::*;
pub use join::*;
pub use literal::*;
pub use operator::*;
pub use table_name::*;
