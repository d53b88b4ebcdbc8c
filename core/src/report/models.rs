use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::signals::{CollectedSignals, RunningWorker, SimilarFailure, TaskInfo, WorkerImage};
use crate::signals::{AUTOLAND, MOZILLA_CENTRAL};
use crate::verdict::{Confidence, Verdict, VerdictKind};

pub fn taskcluster_task_url(root_url: &str, task_id: &str) -> String {
    format!("{}/tasks/{}", root_url.trim_end_matches('/'), task_id)
}

/// Output of a full triage run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageReport {
    pub task_id: String,
    pub task_label: String,
    pub state: String,
    pub worker_pool: String,
    pub is_alpha: bool,
    pub failing_image_version: Option<String>,
    pub production_pool: Option<String>,
    pub production_image_version: Option<String>,
    pub version_differs: bool,
    pub failure_search_skipped: bool,
    pub autoland_failures: u32,
    pub mozilla_central_failures: u32,
    pub similar_failures: Vec<SimilarFailure>,
    pub classification_id: i64,
    pub classification_name: String,
    pub verdict: VerdictKind,
    pub confidence: Confidence,
    pub rationale: String,
    pub taskcluster_url: String,
    pub sbom_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded_signals: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl TriageReport {
    pub fn new(signals: CollectedSignals, verdict: Verdict, root_url: &str) -> Self {
        let autoland_failures = signals.failure_count(AUTOLAND);
        let mozilla_central_failures = signals.failure_count(MOZILLA_CENTRAL);
        let failing_image_version = signals.failing_version().map(str::to_string);
        let production_image_version = signals.production_version().map(str::to_string);
        let sbom_url = signals
            .failing_image
            .as_ref()
            .and_then(|i| i.sbom_url.clone());
        let taskcluster_url = taskcluster_task_url(root_url, &signals.task.task_id);

        let CollectedSignals {
            task,
            is_alpha,
            production_pool,
            version_differs,
            failure_search_skipped,
            similar_failures,
            classification,
            degraded,
            ..
        } = signals;

        Self {
            task_id: task.task_id,
            task_label: task.label,
            state: task.state,
            worker_pool: task.worker_pool,
            is_alpha,
            failing_image_version,
            production_pool,
            production_image_version,
            version_differs,
            failure_search_skipped,
            autoland_failures,
            mozilla_central_failures,
            similar_failures: similar_failures.into_values().flatten().collect(),
            classification_id: classification.id(),
            classification_name: classification.name().to_string(),
            verdict: verdict.verdict,
            confidence: verdict.confidence,
            rationale: verdict.rationale,
            taskcluster_url,
            sbom_url,
            degraded_signals: degraded,
            generated_at: Utc::now(),
        }
    }
}

/// Image facts for a single task (`investigate`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskImageSummary {
    pub task_id: String,
    pub task_label: String,
    pub worker_pool: String,
    pub worker_id: Option<String>,
    pub worker_group: Option<String>,
    pub image_version: Option<String>,
    pub sbom_url: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded_signals: Vec<String>,
}

impl TaskImageSummary {
    pub fn new(task: TaskInfo, image: Option<WorkerImage>, image_note: Option<String>) -> Self {
        let (image_version, sbom_url) = image
            .map(|i| (i.image_version, i.sbom_url))
            .unwrap_or((None, None));
        Self {
            task_id: task.task_id,
            task_label: task.label,
            worker_pool: task.worker_pool,
            worker_id: task.worker_id,
            worker_group: task.worker_group,
            image_version,
            sbom_url,
            status: task.state,
            degraded_signals: image_note.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComparison {
    pub task1: TaskImageSummary,
    pub task2: TaskImageSummary,
    pub image_version_differs: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkersReport {
    pub workers: Vec<RunningWorker>,
    pub count: usize,
}

impl WorkersReport {
    pub fn new(workers: Vec<RunningWorker>) -> Self {
        let count = workers.len();
        Self { workers, count }
    }
}

/// Image-only verdict of the sheriff summary. Unlike the triage engine it
/// never looks at Treeherder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageVerdict {
    #[serde(rename = "IMAGE REGRESSION")]
    ImageRegression,
    #[serde(rename = "NEEDS INVESTIGATION")]
    NeedsInvestigation,
    #[serde(rename = "PRODUCTION FAILURE")]
    ProductionFailure,
}

impl ImageVerdict {
    pub fn decide(is_alpha: bool, version_differs: bool) -> Self {
        match (is_alpha, version_differs) {
            (true, true) => Self::ImageRegression,
            (true, false) => Self::NeedsInvestigation,
            (false, _) => Self::ProductionFailure,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ImageRegression => "IMAGE REGRESSION",
            Self::NeedsInvestigation => "NEEDS INVESTIGATION",
            Self::ProductionFailure => "PRODUCTION FAILURE",
        }
    }

    pub fn detail(self) -> &'static str {
        match self {
            Self::ImageRegression => "Image version differs between alpha and production pools",
            Self::NeedsInvestigation => {
                "Same image version on alpha and production - investigate code or intermittent"
            }
            Self::ProductionFailure => {
                "Failure on production pool - likely code regression or intermittent"
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheriffSummary {
    pub task_id: String,
    pub task_label: String,
    pub state: String,
    pub failing_pool: String,
    pub failing_image_version: Option<String>,
    pub compared_production: bool,
    pub production_pool: Option<String>,
    pub production_image_version: Option<String>,
    pub version_differs: bool,
    pub is_alpha: bool,
    pub verdict: ImageVerdict,
    pub verdict_detail: String,
    pub taskcluster_url: String,
    pub sbom_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub degraded_signals: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_verdict_table() {
        assert_eq!(ImageVerdict::decide(true, true), ImageVerdict::ImageRegression);
        assert_eq!(ImageVerdict::decide(true, false), ImageVerdict::NeedsInvestigation);
        assert_eq!(ImageVerdict::decide(false, false), ImageVerdict::ProductionFailure);
        assert_eq!(ImageVerdict::decide(false, true), ImageVerdict::ProductionFailure);
    }

    #[test]
    fn test_image_verdict_serializes_as_title() {
        assert_eq!(
            serde_json::to_value(ImageVerdict::NeedsInvestigation).unwrap(),
            ImageVerdict::NeedsInvestigation.title()
        );
        assert_eq!(
            serde_json::to_value(ImageVerdict::ProductionFailure).unwrap(),
            "PRODUCTION FAILURE"
        );
    }

    #[test]
    fn test_task_image_summary_keeps_lookup_failure() {
        let task = TaskInfo {
            task_id: "abc".to_string(),
            label: "test-linux/opt-xpcshell-1".to_string(),
            worker_pool: "gecko-t/t-linux".to_string(),
            state: "failed".to_string(),
            worker_id: None,
            worker_group: None,
        };
        let ok = serde_json::to_value(TaskImageSummary::new(task.clone(), None, None)).unwrap();
        assert!(ok["imageVersion"].is_null());
        assert!(ok.get("degradedSignals").is_none());

        let failed = TaskImageSummary::new(
            task,
            None,
            Some("image lookup for gecko-t/t-linux failed: timeout".to_string()),
        );
        let v = serde_json::to_value(&failed).unwrap();
        assert!(v["imageVersion"].is_null());
        assert_eq!(
            v["degradedSignals"][0],
            "image lookup for gecko-t/t-linux failed: timeout"
        );
    }

    #[test]
    fn test_taskcluster_task_url_trims_slash() {
        assert_eq!(
            taskcluster_task_url("https://tc.example/", "abc"),
            "https://tc.example/tasks/abc"
        );
    }
}
