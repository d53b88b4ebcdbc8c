use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::http::{build_client, parse_json_response, send};

#[derive(Debug, Clone, Deserialize)]
pub struct Push {
    pub id: u64,
    #[serde(default)]
    pub revision: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub id: u64,
    #[serde(default)]
    pub job_type_name: String,
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub failure_classification_id: Option<i64>,
}

#[derive(Deserialize)]
struct Results<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Clone)]
pub struct TreeherderClient {
    http: reqwest::Client,
    base_url: String,
    url_project: String,
}

impl TreeherderClient {
    pub fn new(base_url: &str, timeout_ms: u64, user_agent: &str) -> anyhow::Result<Self> {
        let http = build_client(timeout_ms, Some(user_agent))?;
        let normalized = base_url.trim_end_matches('/');
        Ok(Self {
            http,
            base_url: normalized.to_string(),
            url_project: format!("{}/api/project", normalized),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_results<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        stage: &'static str,
    ) -> anyhow::Result<Vec<T>> {
        tracing::debug!(target: "sheriff.th", stage = stage, url = %url, query = ?query);
        let resp = send(self.http.get(url).query(query), url).await?;
        let status = resp.status();
        let v = parse_json_response(resp).await?;
        if v.is_null() {
            return Ok(Vec::new());
        }
        let parsed: Results<T> = serde_json::from_value(v)
            .map_err(|e| anyhow::anyhow!("unexpected treeherder payload from {url}: {e}"))?;
        tracing::debug!(
            target: "sheriff.th",
            stage = stage,
            status = %status,
            results = parsed.results.len()
        );
        Ok(parsed.results)
    }

    /// Most recent pushes, newest first.
    pub async fn pushes(&self, repo: &str, count: u32) -> anyhow::Result<Vec<Push>> {
        let url = format!("{}/{}/push/", self.url_project, repo);
        self.get_results(&url, &[("count", count.to_string())], "th.push")
            .await
    }

    pub async fn jobs_for_push(&self, repo: &str, push_id: u64) -> anyhow::Result<Vec<Job>> {
        let url = format!("{}/{}/jobs/", self.url_project, repo);
        self.get_results(&url, &[("push_id", push_id.to_string())], "th.jobs.push")
            .await
    }

    pub async fn jobs_for_task(&self, repo: &str, task_id: &str) -> anyhow::Result<Vec<Job>> {
        let url = format!("{}/{}/jobs/", self.url_project, repo);
        self.get_results(&url, &[("task_id", task_id.to_string())], "th.jobs.task")
            .await
    }
}
