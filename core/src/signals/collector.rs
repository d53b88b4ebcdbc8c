//! Signal collection for the verdict engine.
//!
//! The task definition is fetched first; it is the only fatal lookup. The
//! remaining signals are fetched concurrently and each one degrades to its
//! documented default when its provider fails.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;

use crate::error::CollectError;
use crate::progress::TriageProgress;
use crate::util::test_name_from_label;
use crate::verdict::{Classification, PoolSuffixes, SignalTuple};

use super::models::{SimilarFailure, TaskInfo, WorkerImage};
use super::r#trait::{
    ClassificationProvider, FailureSearchProvider, ImageProvider, TaskMetadataProvider,
};

pub const AUTOLAND: &str = "autoland";
pub const MOZILLA_CENTRAL: &str = "mozilla-central";

#[derive(Clone)]
pub struct Providers {
    pub tasks: Arc<dyn TaskMetadataProvider>,
    pub images: Arc<dyn ImageProvider>,
    pub failures: Arc<dyn FailureSearchProvider>,
    pub classifications: Arc<dyn ClassificationProvider>,
}

/// Everything gathered for one task, before the verdict.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedSignals {
    pub task: TaskInfo,
    pub is_alpha: bool,
    pub failing_image: Option<WorkerImage>,
    pub production_pool: Option<String>,
    pub production_image: Option<WorkerImage>,
    pub version_differs: bool,
    pub failure_search_skipped: bool,
    pub similar_failures: BTreeMap<String, Vec<SimilarFailure>>,
    pub classification: Classification,
    pub classification_repo: Option<String>,
    /// Sub-signals that could not be fetched and were defaulted.
    pub degraded: Vec<String>,
}

impl CollectedSignals {
    pub fn failure_count(&self, repo: &str) -> u32 {
        self.similar_failures
            .get(repo)
            .map(|v| u32::try_from(v.len()).unwrap_or(u32::MAX))
            .unwrap_or(0)
    }

    pub fn failing_version(&self) -> Option<&str> {
        self.failing_image.as_ref()?.image_version.as_deref()
    }

    pub fn production_version(&self) -> Option<&str> {
        self.production_image.as_ref()?.image_version.as_deref()
    }

    pub fn tuple(&self) -> SignalTuple {
        SignalTuple {
            is_alpha: self.is_alpha,
            version_differs: self.version_differs,
            autoland_failures: self.failure_count(AUTOLAND),
            central_failures: self.failure_count(MOZILLA_CENTRAL),
            classification_id: self.classification,
        }
    }
}

/// Unknown on either side never counts as a difference.
pub fn versions_differ(failing: Option<&str>, production: Option<&str>) -> bool {
    matches!((failing, production), (Some(a), Some(b)) if a != b)
}

fn skipped_pushes_note(repo: &str, pushes: &[u64]) -> String {
    let ids: Vec<String> = pushes.iter().map(u64::to_string).collect();
    format!(
        "similar-failure search on {repo} skipped pushes {}; count may be low",
        ids.join(", ")
    )
}

pub struct SignalCollector {
    providers: Providers,
    suffixes: PoolSuffixes,
    search_repos: Vec<String>,
    skip_failure_search: bool,
}

impl SignalCollector {
    pub fn new(providers: Providers, suffixes: PoolSuffixes, search_repos: Vec<String>) -> Self {
        Self {
            providers,
            suffixes,
            search_repos,
            skip_failure_search: false,
        }
    }

    pub fn skip_failure_search(mut self, skip: bool) -> Self {
        self.skip_failure_search = skip;
        self
    }

    pub fn providers(&self) -> &Providers {
        &self.providers
    }

    pub fn suffixes(&self) -> &PoolSuffixes {
        &self.suffixes
    }

    pub async fn fetch_task(&self, task_id: &str) -> Result<TaskInfo, CollectError> {
        tracing::debug!(
            target: "sheriff.triage",
            stage = "collect.task.in",
            task_id = %task_id,
            provider = self.providers.tasks.name()
        );
        match self.providers.tasks.task(task_id).await? {
            Some(task) => Ok(task),
            None => Err(CollectError::TaskNotFound {
                task_id: task_id.to_string(),
                reason: "queue has no such task".to_string(),
            }),
        }
    }

    /// Image data for a pool; `None` plus a note when the lookup failed.
    pub async fn worker_image(&self, pool: &str) -> (Option<WorkerImage>, Option<String>) {
        match self.providers.images.worker_image(pool).await {
            Ok(image) => {
                if image.is_none() {
                    tracing::debug!(
                        target: "sheriff.triage",
                        stage = "collect.image.missing",
                        worker_pool = %pool
                    );
                }
                (image, None)
            }
            Err(e) => {
                tracing::warn!(
                    target: "sheriff.triage",
                    stage = "collect.image.degraded",
                    worker_pool = %pool,
                    error = %e
                );
                (None, Some(format!("image lookup for {pool} failed: {e}")))
            }
        }
    }

    async fn search_failures(
        &self,
        test_name: &str,
        progress: &TriageProgress,
    ) -> (BTreeMap<String, Vec<SimilarFailure>>, Vec<String>) {
        let mut notes = Vec::new();
        let mut out = BTreeMap::new();

        if test_name.is_empty() {
            notes.push("task label has no test name; similar-failure search skipped".to_string());
            progress.complete("Skipped Treeherder search");
            return (out, notes);
        }

        let searches = self.search_repos.iter().map(|repo| async move {
            let res = self.providers.failures.similar_failures(test_name, repo).await;
            (repo.clone(), res)
        });

        for (repo, res) in join_all(searches).await {
            match res {
                Ok(found) => {
                    tracing::debug!(
                        target: "sheriff.triage",
                        stage = "collect.failures.out",
                        repo = %repo,
                        matches = found.failures.len(),
                        skipped_pushes = found.skipped_pushes.len()
                    );
                    if !found.skipped_pushes.is_empty() {
                        notes.push(skipped_pushes_note(&repo, &found.skipped_pushes));
                    }
                    out.insert(repo, found.failures);
                }
                Err(e) => {
                    tracing::warn!(
                        target: "sheriff.triage",
                        stage = "collect.failures.degraded",
                        repo = %repo,
                        error = %e
                    );
                    notes.push(format!("similar-failure search on {repo} failed: {e}"));
                    out.insert(repo, Vec::new());
                }
            }
        }

        progress.complete("Searched for similar failures");
        (out, notes)
    }

    async fn classification(
        &self,
        task_id: &str,
        progress: &TriageProgress,
    ) -> (Classification, Option<String>, Option<String>) {
        let res = self.providers.classifications.classification(task_id).await;
        progress.complete("Checked Treeherder classification");
        match res {
            Ok(Some(prior)) => (prior.classification, Some(prior.repo), None),
            Ok(None) => (Classification::NotClassified, None, None),
            Err(e) => {
                tracing::warn!(
                    target: "sheriff.triage",
                    stage = "collect.classification.degraded",
                    task_id = %task_id,
                    error = %e
                );
                (
                    Classification::NotClassified,
                    None,
                    Some(format!("classification lookup failed: {e}")),
                )
            }
        }
    }

    async fn images(
        &self,
        failing_pool: &str,
        production_pool: Option<&str>,
        progress: &TriageProgress,
    ) -> (Option<WorkerImage>, Option<WorkerImage>, Vec<String>) {
        let production = async {
            match production_pool {
                Some(pool) => self.worker_image(pool).await,
                None => (None, None),
            }
        };
        let ((failing, note_a), (production, note_b)) =
            tokio::join!(self.worker_image(failing_pool), production);
        progress.complete("Compared image versions");
        (
            failing,
            production,
            note_a.into_iter().chain(note_b).collect(),
        )
    }

    pub async fn collect(
        &self,
        task_id: &str,
        progress: &TriageProgress,
    ) -> Result<CollectedSignals, CollectError> {
        progress.step("Getting task info...");
        let task = self.fetch_task(task_id).await?;
        progress.complete("Got task info");

        let is_alpha = self.suffixes.is_alpha(&task.worker_pool);
        let production_pool = is_alpha.then(|| self.suffixes.strip(&task.worker_pool).to_string());
        let test_name = test_name_from_label(&task.label).to_string();

        progress.step("Comparing image versions and searching Treeherder...");
        let failures = async {
            if self.skip_failure_search {
                progress.complete("Skipped Treeherder search");
                (BTreeMap::new(), Vec::new())
            } else {
                self.search_failures(&test_name, progress).await
            }
        };
        let (
            (failing_image, production_image, image_notes),
            (similar_failures, failure_notes),
            (classification, classification_repo, classification_note),
        ) = tokio::join!(
            self.images(&task.worker_pool, production_pool.as_deref(), progress),
            failures,
            self.classification(&task.task_id, progress),
        );

        let version_differs = is_alpha
            && versions_differ(
                failing_image.as_ref().and_then(|i| i.image_version.as_deref()),
                production_image
                    .as_ref()
                    .and_then(|i| i.image_version.as_deref()),
            );

        let mut degraded = image_notes;
        degraded.extend(failure_notes);
        degraded.extend(classification_note);

        tracing::info!(
            target: "sheriff.triage",
            stage = "collect.done",
            task_id = %task.task_id,
            worker_pool = %task.worker_pool,
            is_alpha,
            version_differs,
            classification = classification.id(),
            degraded = degraded.len()
        );

        Ok(CollectedSignals {
            task,
            is_alpha,
            failing_image,
            production_pool,
            production_image,
            version_differs,
            failure_search_skipped: self.skip_failure_search,
            similar_failures,
            classification,
            classification_repo,
            degraded,
        })
    }
}
