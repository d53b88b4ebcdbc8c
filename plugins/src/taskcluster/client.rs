use serde_json::Value;

use crate::http::{build_client, parse_json_response, parse_optional_json, send};

/// Thin REST client for the Taskcluster queue and worker manager.
#[derive(Clone)]
pub struct TaskclusterClient {
    http: reqwest::Client,
    url_queue_task: String,
    url_worker_pool: String,
    url_workers: String,
}

impl TaskclusterClient {
    pub fn new(root_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let http = build_client(timeout_ms, None)?;
        let normalized = root_url.trim_end_matches('/');
        Ok(Self {
            http,
            url_queue_task: format!("{}/api/queue/v1/task", normalized),
            url_worker_pool: format!("{}/api/worker-manager/v1/worker-pool", normalized),
            url_workers: format!("{}/api/worker-manager/v1/workers", normalized),
        })
    }

    /// Task definition; `None` when the queue does not know the task.
    pub async fn task_definition(&self, task_id: &str) -> anyhow::Result<Option<Value>> {
        let url = format!("{}/{}", self.url_queue_task, task_id);
        tracing::debug!(target: "sheriff.tc", stage = "tc.task.in", url = %url);
        let resp = send(self.http.get(&url), &url).await?;
        let status = resp.status();
        let v = parse_optional_json(resp).await?;
        tracing::debug!(target: "sheriff.tc", stage = "tc.task.out", status = %status);
        Ok(v)
    }

    pub async fn task_status(&self, task_id: &str) -> anyhow::Result<Option<Value>> {
        let url = format!("{}/{}/status", self.url_queue_task, task_id);
        tracing::debug!(target: "sheriff.tc", stage = "tc.status.in", url = %url);
        let resp = send(self.http.get(&url), &url).await?;
        parse_optional_json(resp).await
    }

    /// Worker pool definition; `None` when the pool does not exist.
    pub async fn worker_pool(&self, worker_pool: &str) -> anyhow::Result<Option<Value>> {
        let url = format!("{}/{}", self.url_worker_pool, worker_pool);
        tracing::debug!(target: "sheriff.tc", stage = "tc.pool.in", url = %url);
        let resp = send(self.http.get(&url), &url).await?;
        parse_optional_json(resp).await
    }

    /// All workers of a pool, following continuation tokens.
    pub async fn workers(&self, worker_pool: &str) -> anyhow::Result<Vec<Value>> {
        let url = format!("{}/{}", self.url_workers, worker_pool);
        let mut out = Vec::new();
        let mut token: Option<String> = None;

        loop {
            tracing::debug!(
                target: "sheriff.tc",
                stage = "tc.workers.in",
                url = %url,
                page = token.is_some()
            );
            let mut req = self.http.get(&url);
            if let Some(t) = &token {
                req = req.query(&[("continuationToken", t.as_str())]);
            }
            let resp = send(req, &url).await?;
            let page = parse_json_response(resp).await?;

            if let Some(workers) = page.get("workers").and_then(Value::as_array) {
                out.extend(workers.iter().cloned());
            }
            token = page
                .get("continuationToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if token.is_none() {
                break;
            }
        }

        tracing::debug!(target: "sheriff.tc", stage = "tc.workers.out", workers = out.len());
        Ok(out)
    }
}
