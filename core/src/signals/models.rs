use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CollectError;
use crate::verdict::Classification;

/// `<provisioner>/<worker-type>`, e.g. `gecko-t/win11-64-24h2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPoolId {
    pub provisioner: String,
    pub worker_type: String,
}

impl WorkerPoolId {
    pub fn parse(pool: &str) -> Result<Self, CollectError> {
        let mut parts = pool.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(w), None) if !p.is_empty() && !w.is_empty() => Ok(Self {
                provisioner: p.to_string(),
                worker_type: w.to_string(),
            }),
            _ => Err(CollectError::InvalidWorkerPool(pool.to_string())),
        }
    }
}

impl fmt::Display for WorkerPoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provisioner, self.worker_type)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInfo {
    pub task_id: String,
    pub label: String,
    pub worker_pool: String,
    pub state: String,
    pub worker_id: Option<String>,
    pub worker_group: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerImage {
    pub worker_pool: String,
    pub image_version: Option<String>,
    pub sbom_url: Option<String>,
    pub locations: Vec<String>,
    pub provider: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningWorker {
    pub worker_id: String,
    pub worker_group: String,
    pub provider_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimilarFailure {
    pub repo: String,
    pub job_id: u64,
    pub job_type_name: String,
    pub result: String,
    pub failure_classification_id: Option<i64>,
    pub revision: String,
    pub treeherder_url: String,
}

/// Matches on one branch plus the pushes whose jobs could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureSearch {
    pub failures: Vec<SimilarFailure>,
    pub skipped_pushes: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorClassification {
    pub classification: Classification,
    pub repo: String,
}
