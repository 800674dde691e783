//! Statistics collection backend

use crate::CollectTask;
use async_trait::async_trait;

/// Failure of one collection task
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectError {
    #[error("Collecting {target} failed: {reason}")]
    TaskFailed { target: String, reason: String },

    #[error("Statistics executor unavailable: {0}")]
    Unavailable(String),
}

/// Runs collection tasks against the storage layer
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticsExecutor: Send + Sync {
    /// Collect statistics for one task
    async fn collect(&self, task: &CollectTask) -> Result<(), CollectError>;
}
