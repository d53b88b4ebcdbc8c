use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use sheriff_core::api::{
    Classification, ClassificationProvider, FailureSearch, FailureSearchProvider,
    PriorClassification, SimilarFailure,
};

use super::client::{Job, Push, TreeherderClient};

const FAILED_RESULTS: [&str; 2] = ["testfailed", "busted"];
const REVISION_PREFIX: usize = 12;

pub struct TreeherderProvider {
    client: TreeherderClient,
    push_limit: u32,
    classification_repos: Vec<String>,
}

impl TreeherderProvider {
    pub fn new(
        base_url: &str,
        timeout_ms: u64,
        user_agent: &str,
        push_limit: u32,
        classification_repos: Vec<String>,
    ) -> Result<Self> {
        let client = TreeherderClient::new(base_url, timeout_ms, user_agent)?;
        Ok(Self {
            client,
            push_limit,
            classification_repos,
        })
    }
}

/// Case-insensitive substring match on the job name, failed results only.
pub fn is_similar_failure(job: &Job, test_name_lower: &str) -> bool {
    FAILED_RESULTS.contains(&job.result.as_str())
        && job.job_type_name.to_lowercase().contains(test_name_lower)
}

fn similar_failure(base_url: &str, repo: &str, push: &Push, job: &Job) -> SimilarFailure {
    SimilarFailure {
        repo: repo.to_string(),
        job_id: job.id,
        job_type_name: job.job_type_name.clone(),
        result: job.result.clone(),
        failure_classification_id: job.failure_classification_id,
        revision: push.revision.chars().take(REVISION_PREFIX).collect(),
        treeherder_url: format!(
            "{base_url}/jobs?repo={repo}&revision={}&selectedJobId={}",
            push.revision, job.id
        ),
    }
}

/// Unknown ids are logged and treated as unclassified.
pub fn classification_from_job(job: &Job) -> Classification {
    let id = job.failure_classification_id.unwrap_or(1);
    Classification::from_id(id).unwrap_or_else(|| {
        tracing::warn!(
            target: "sheriff.th",
            stage = "th.classification.unknown",
            job_id = job.id,
            classification_id = id
        );
        Classification::NotClassified
    })
}

#[async_trait]
impl FailureSearchProvider for TreeherderProvider {
    fn name(&self) -> &str {
        "treeherder"
    }

    async fn similar_failures(&self, test_name: &str, repo: &str) -> Result<FailureSearch> {
        let needle = test_name.to_lowercase();
        let pushes = self.client.pushes(repo, self.push_limit).await?;
        let base_url = self.client.base_url();

        let fetches = pushes.iter().map(|push| self.client.jobs_for_push(repo, push.id));
        let results = join_all(fetches).await;

        let mut search = FailureSearch::default();
        for (push, res) in pushes.iter().zip(results) {
            match res {
                Ok(jobs) => search.failures.extend(
                    jobs.iter()
                        .filter(|job| is_similar_failure(job, &needle))
                        .map(|job| similar_failure(base_url, repo, push, job)),
                ),
                Err(e) => {
                    tracing::warn!(
                        target: "sheriff.th",
                        stage = "th.similar.push_failed",
                        repo = %repo,
                        push_id = push.id,
                        error = %e
                    );
                    search.skipped_pushes.push(push.id);
                }
            }
        }

        tracing::debug!(
            target: "sheriff.th",
            stage = "th.similar.out",
            repo = %repo,
            test_name = %test_name,
            pushes = pushes.len(),
            skipped = search.skipped_pushes.len(),
            matches = search.failures.len()
        );
        Ok(search)
    }
}

#[async_trait]
impl ClassificationProvider for TreeherderProvider {
    fn name(&self) -> &str {
        "treeherder"
    }

    async fn classification(&self, task_id: &str) -> Result<Option<PriorClassification>> {
        let mut last_err = None;
        let mut any_ok = false;

        for repo in &self.classification_repos {
            match self.client.jobs_for_task(repo, task_id).await {
                Ok(jobs) => {
                    any_ok = true;
                    if let Some(job) = jobs.first() {
                        let classification = classification_from_job(job);
                        tracing::debug!(
                            target: "sheriff.th",
                            stage = "th.classification.out",
                            repo = %repo,
                            classification = classification.id()
                        );
                        return Ok(Some(PriorClassification {
                            classification,
                            repo: repo.clone(),
                        }));
                    }
                }
                Err(e) => {
                    tracing::debug!(
                        target: "sheriff.th",
                        stage = "th.classification.repo_failed",
                        repo = %repo,
                        error = %e
                    );
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) if !any_ok => Err(e),
            _ => Ok(None),
        }
    }
}
