use async_trait::async_trait;

use super::models::{FailureSearch, PriorClassification, RunningWorker, TaskInfo, WorkerImage};

/// Task definition and run state (Taskcluster queue).
#[async_trait]
pub trait TaskMetadataProvider: Send + Sync {
    fn name(&self) -> &str;
    /// `Ok(None)` when the task does not exist.
    async fn task(&self, task_id: &str) -> anyhow::Result<Option<TaskInfo>>;
}

/// Worker pool image data (Taskcluster worker manager).
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;
    /// `Ok(None)` when the pool is unknown.
    async fn worker_image(&self, worker_pool: &str) -> anyhow::Result<Option<WorkerImage>>;
    async fn running_workers(&self, worker_pool: &str) -> anyhow::Result<Vec<RunningWorker>>;
}

/// Historical failures of the same test on one branch.
#[async_trait]
pub trait FailureSearchProvider: Send + Sync {
    fn name(&self) -> &str;
    /// Returns an empty list, never an error, when nothing matched. A push
    /// whose jobs cannot be fetched is listed in `skipped_pushes`; the
    /// matches from the other pushes are kept.
    async fn similar_failures(&self, test_name: &str, repo: &str) -> anyhow::Result<FailureSearch>;
}

/// Prior classification recorded for a job.
#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn classification(&self, task_id: &str) -> anyhow::Result<Option<PriorClassification>>;
}
