//! Statistics job model

use crate::StatisticsExecutor;
use chrono::{DateTime, Local};
use sqlscope_ast::TableName;
use std::collections::BTreeMap;
use std::fmt;

/// How much data a job reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyzeType {
    Sample,
    Full,
    Histogram,
}

/// Whether a job runs once or repeatedly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScheduleType {
    Once,
    Schedule,
}

/// Job lifecycle state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Finished,
    Failed(String),
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Running => write!(f, "RUNNING"),
            Self::Finished => write!(f, "FINISHED"),
            Self::Failed(reason) => write!(f, "FAILED: {reason}"),
        }
    }
}

/// One unit of collection work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectTask {
    pub job_id: u64,
    pub table: TableName,
    /// `None` collects the whole table
    pub column: Option<String>,
    pub analyze_type: AnalyzeType,
    pub properties: BTreeMap<String, String>,
}

impl CollectTask {
    /// `db.table` or `db.table.column`
    pub fn target(&self) -> String {
        match &self.column {
            Some(column) => format!("{}.{}", self.table, column),
            None => self.table.to_string(),
        }
    }
}

/// A statistics collection job
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeJob {
    id: u64,
    pub table: TableName,
    /// Empty means every column
    pub columns: Vec<String>,
    pub analyze_type: AnalyzeType,
    pub schedule: ScheduleType,
    pub properties: BTreeMap<String, String>,
    status: JobStatus,
    work_time: Option<DateTime<Local>>,
}

impl AnalyzeJob {
    /// A one-shot sample job over every column of `table`
    pub fn new(table: TableName) -> Self {
        Self {
            id: 0,
            table,
            columns: Vec::new(),
            analyze_type: AnalyzeType::Sample,
            schedule: ScheduleType::Once,
            properties: BTreeMap::new(),
            status: JobStatus::Pending,
            work_time: None,
        }
    }

    pub fn with_columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_analyze_type(mut self, analyze_type: AnalyzeType) -> Self {
        self.analyze_type = analyze_type;
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleType) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub(crate) fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    pub(crate) fn mark_running(&mut self) {
        self.status = JobStatus::Running;
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn status(&self) -> &JobStatus {
        &self.status
    }

    /// When the job last finished or failed
    pub fn work_time(&self) -> Option<DateTime<Local>> {
        self.work_time
    }

    /// One task per column, or a single whole-table task
    pub fn plan(&self) -> Vec<CollectTask> {
        let task = |column: Option<String>| CollectTask {
            job_id: self.id,
            table: self.table.clone(),
            column,
            analyze_type: self.analyze_type,
            properties: self.properties.clone(),
        };
        if self.columns.is_empty() {
            vec![task(None)]
        } else {
            self.columns.iter().cloned().map(|c| task(Some(c))).collect()
        }
    }

    /// Run every planned task in order, stopping at the first failure
    pub async fn run(&mut self, executor: &dyn StatisticsExecutor) -> JobStatus {
        self.mark_running();
        log::info!("Statistics job {} on {} started", self.id, self.table);

        for task in self.plan() {
            if let Err(err) = executor.collect(&task).await {
                self.work_time = Some(Local::now());
                self.status = JobStatus::Failed(err.to_string());
                log::info!("Statistics job {} failed: {}", self.id, err);
                return self.status.clone();
            }
        }

        self.work_time = Some(Local::now());
        self.status = match self.schedule {
            ScheduleType::Once => JobStatus::Finished,
            ScheduleType::Schedule => JobStatus::Pending,
        };
        log::info!("Statistics job {} is {}", self.id, self.status);
        self.status.clone()
    }
}
