//! Catalog collaborator for sqlscope
//!
//! The analysis core treats the catalog as a read-only lookup service:
//! databases by name, tables within a database, and the kind and state of
//! each table. [`MemoryCatalog`] is a thread-safe in-memory implementation
//! used by embedders and tests.

mod database;
mod memory;
mod provider;
mod table;

pub use database::*;
pub use memory::*;
pub use provider::*;
pub use table::*;
