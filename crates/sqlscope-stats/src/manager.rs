//! In-memory job registry and runner

use crate::{AnalyzeJob, JobStatus, StatisticsExecutor};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Registers statistics jobs and runs them through one executor
pub struct AnalyzeManager {
    jobs: RwLock<IndexMap<u64, AnalyzeJob>>,
    next_id: AtomicU64,
    executor: Arc<dyn StatisticsExecutor>,
}

impl AnalyzeManager {
    pub fn new(executor: Arc<dyn StatisticsExecutor>) -> Self {
        Self {
            jobs: RwLock::new(IndexMap::new()),
            next_id: AtomicU64::new(1),
            executor,
        }
    }

    /// Register a job and return its id
    pub fn add_job(&self, mut job: AnalyzeJob) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        job.set_id(id);
        log::info!("Registered statistics job {} on {}", id, job.table);
        self.jobs.write().insert(id, job);
        id
    }

    pub fn job(&self, id: u64) -> Option<AnalyzeJob> {
        self.jobs.read().get(&id).cloned()
    }

    /// All jobs in registration order
    pub fn jobs(&self) -> Vec<AnalyzeJob> {
        self.jobs.read().values().cloned().collect()
    }

    /// Ids of jobs waiting to run
    pub fn pending_jobs(&self) -> Vec<u64> {
        self.jobs
            .read()
            .values()
            .filter(|job| *job.status() == JobStatus::Pending)
            .map(AnalyzeJob::id)
            .collect()
    }

    /// Run one job; `None` if the id is unknown or the job is already running
    pub async fn run_job(&self, id: u64) -> Option<JobStatus> {
        let mut job = {
            let mut jobs = self.jobs.write();
            let job = jobs.get_mut(&id)?;
            if *job.status() == JobStatus::Running {
                return None;
            }
            job.mark_running();
            job.clone()
        };

        let status = job.run(self.executor.as_ref()).await;
        self.jobs.write().insert(id, job);
        Some(status)
    }

    /// Run every pending job concurrently
    pub async fn run_pending(&self) -> Vec<(u64, JobStatus)> {
        let ids = self.pending_jobs();
        let runs = ids.into_iter().map(|id| async move {
            self.run_job(id).await.map(|status| (id, status))
        });
        futures::future::join_all(runs)
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    /// Run every pending job on a background task
    pub fn spawn_pending(self: &Arc<Self>) -> tokio::task::JoinHandle<Vec<(u64, JobStatus)>> {
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.run_pending().await })
    }
}

impl std::fmt::Debug for AnalyzeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzeManager")
            .field("jobs", &self.jobs.read().len())
            .finish_non_exhaustive()
    }
}
