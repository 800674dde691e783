//! Statistics collection jobs
//!
//! A job describes which table (and optionally which columns) to collect
//! statistics for. Running it plans independent collection tasks and hands
//! them to a [`StatisticsExecutor`] in order, stopping at the first failure.
//! [`AnalyzeManager`] keeps jobs in memory and runs them on demand or in the
//! background.

mod executor;
mod job;
mod manager;

pub use executor::*;
pub use job::*;
pub use manager::*;
