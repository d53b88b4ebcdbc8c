use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use sheriff_core::api::{
    parse_image_version, ImageProvider, RunningWorker, TaskInfo, TaskMetadataProvider,
    WorkerImage,
};

use super::client::TaskclusterClient;

pub struct TaskclusterProvider {
    client: TaskclusterClient,
}

impl TaskclusterProvider {
    pub fn new(root_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = TaskclusterClient::new(root_url, timeout_ms)?;
        Ok(Self { client })
    }
}

fn str_at<'a>(v: &'a Value, pointer: &str) -> Option<&'a str> {
    v.pointer(pointer).and_then(Value::as_str)
}

/// Merge a queue task definition and its (optional) status document.
pub fn parse_task_info(task_id: &str, definition: &Value, status: Option<&Value>) -> TaskInfo {
    let provisioner = str_at(definition, "/provisionerId").unwrap_or("unknown");
    let worker_type = str_at(definition, "/workerType").unwrap_or("unknown");

    let status = status.and_then(|s| s.get("status"));
    let last_run = status
        .and_then(|s| s.get("runs"))
        .and_then(Value::as_array)
        .and_then(|runs| runs.last());

    TaskInfo {
        task_id: task_id.to_string(),
        label: str_at(definition, "/metadata/name")
            .unwrap_or("unknown")
            .to_string(),
        worker_pool: format!("{provisioner}/{worker_type}"),
        state: status
            .and_then(|s| s.get("state"))
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string(),
        worker_id: last_run
            .and_then(|r| r.get("workerId"))
            .and_then(Value::as_str)
            .map(str::to_string),
        worker_group: last_run
            .and_then(|r| r.get("workerGroup"))
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Image facts from a worker pool definition. The first launch config that
/// carries an SBOM link wins; locations are collected from all of them.
pub fn parse_worker_image(worker_pool: &str, pool: &Value) -> WorkerImage {
    let mut image = WorkerImage {
        worker_pool: worker_pool.to_string(),
        provider: str_at(pool, "/providerId").map(str::to_string),
        ..Default::default()
    };

    let launch_configs = pool
        .pointer("/config/launchConfigs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for lc in launch_configs {
        if let Some(location) = str_at(lc, "/location") {
            if !image.locations.iter().any(|l| l == location) {
                image.locations.push(location.to_string());
            }
        }

        if image.sbom_url.is_none() {
            if let Some(sbom) = str_at(lc, "/workerConfig/genericWorker/config/workerTypeMetaData/sbom")
                .filter(|s| !s.is_empty())
            {
                image.image_version = parse_image_version(sbom);
                image.sbom_url = Some(sbom.to_string());
            }
        }
    }

    image
}

pub fn parse_running_workers(workers: &[Value]) -> Vec<RunningWorker> {
    workers
        .iter()
        .filter(|w| str_at(w, "/state") == Some("running"))
        .map(|w| RunningWorker {
            worker_id: str_at(w, "/workerId").unwrap_or_default().to_string(),
            worker_group: str_at(w, "/workerGroup").unwrap_or_default().to_string(),
            provider_id: str_at(w, "/providerId").map(str::to_string),
        })
        .collect()
}

#[async_trait]
impl TaskMetadataProvider for TaskclusterProvider {
    fn name(&self) -> &str {
        "taskcluster"
    }

    async fn task(&self, task_id: &str) -> Result<Option<TaskInfo>> {
        let (definition, status) = tokio::join!(
            self.client.task_definition(task_id),
            self.client.task_status(task_id)
        );
        let Some(definition) = definition? else {
            return Ok(None);
        };

        // Run details are optional; a task without status still triages.
        let status = match status {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(
                    target: "sheriff.tc",
                    stage = "tc.status.degraded",
                    task_id = %task_id,
                    error = %e
                );
                None
            }
        };

        let info = parse_task_info(task_id, &definition, status.as_ref());
        tracing::debug!(
            target: "sheriff.tc",
            stage = "tc.task.parsed",
            task_id = %task_id,
            worker_pool = %info.worker_pool,
            state = %info.state
        );
        Ok(Some(info))
    }
}

#[async_trait]
impl ImageProvider for TaskclusterProvider {
    fn name(&self) -> &str {
        "taskcluster"
    }

    async fn worker_image(&self, worker_pool: &str) -> Result<Option<WorkerImage>> {
        let pool = self.client.worker_pool(worker_pool).await?;
        Ok(pool.map(|p| parse_worker_image(worker_pool, &p)))
    }

    async fn running_workers(&self, worker_pool: &str) -> Result<Vec<RunningWorker>> {
        let workers = self.client.workers(worker_pool).await?;
        Ok(parse_running_workers(&workers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pool_definition() -> Value {
        json!({
            "workerPoolId": "gecko-t/win11-64-24h2-alpha",
            "providerId": "azure2",
            "config": {
                "launchConfigs": [
                    {
                        "location": "eastus",
                        "workerConfig": {"genericWorker": {"config": {"workerTypeMetaData": {}}}}
                    },
                    {
                        "location": "westus",
                        "workerConfig": {"genericWorker": {"config": {"workerTypeMetaData": {
                            "sbom": "https://example.com/sboms/win11-64-24h2-alpha-1.0.9.md"
                        }}}}
                    },
                    {
                        "location": "eastus",
                        "workerConfig": {"genericWorker": {"config": {"workerTypeMetaData": {
                            "sbom": "https://example.com/sboms/win11-64-24h2-alpha-1.0.7.md"
                        }}}}
                    }
                ]
            }
        })
    }

    #[test]
    fn test_parse_worker_image_first_sbom_wins() {
        let image = parse_worker_image("gecko-t/win11-64-24h2-alpha", &pool_definition());
        assert_eq!(image.image_version.as_deref(), Some("1.0.9"));
        assert_eq!(
            image.sbom_url.as_deref(),
            Some("https://example.com/sboms/win11-64-24h2-alpha-1.0.9.md")
        );
        assert_eq!(image.locations, vec!["eastus", "westus"]);
        assert_eq!(image.provider.as_deref(), Some("azure2"));
    }

    #[test]
    fn test_parse_worker_image_without_launch_configs() {
        let image = parse_worker_image("gecko-t/x", &json!({"config": {}}));
        assert_eq!(image.image_version, None);
        assert_eq!(image.sbom_url, None);
        assert!(image.locations.is_empty());
    }

    #[test]
    fn test_parse_task_info_uses_last_run() {
        let definition = json!({
            "provisionerId": "gecko-t",
            "workerType": "win11-64-24h2-alpha",
            "metadata": {"name": "test-windows11-64-24h2/opt-mochitest-1"}
        });
        let status = json!({
            "status": {
                "state": "failed",
                "runs": [
                    {"runId": 0, "workerId": "vm-old", "workerGroup": "westus"},
                    {"runId": 1, "workerId": "vm-new", "workerGroup": "eastus"}
                ]
            }
        });
        let info = parse_task_info("abc", &definition, Some(&status));
        assert_eq!(info.worker_pool, "gecko-t/win11-64-24h2-alpha");
        assert_eq!(info.label, "test-windows11-64-24h2/opt-mochitest-1");
        assert_eq!(info.state, "failed");
        assert_eq!(info.worker_id.as_deref(), Some("vm-new"));
        assert_eq!(info.worker_group.as_deref(), Some("eastus"));
    }

    #[test]
    fn test_parse_task_info_without_status() {
        let info = parse_task_info("abc", &json!({}), None);
        assert_eq!(info.worker_pool, "unknown/unknown");
        assert_eq!(info.label, "unknown");
        assert_eq!(info.state, "unknown");
        assert_eq!(info.worker_id, None);
    }

    #[test]
    fn test_parse_running_workers_filters_state() {
        let workers = vec![
            json!({"workerId": "a", "workerGroup": "eastus", "providerId": "azure2", "state": "running"}),
            json!({"workerId": "b", "workerGroup": "eastus", "state": "stopping"}),
        ];
        let running = parse_running_workers(&workers);
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].worker_id, "a");
        assert_eq!(running[0].provider_id.as_deref(), Some("azure2"));
    }

    #[tokio::test]
    async fn test_task_survives_status_failure() {
        let mut server = Server::new_async().await;
        let _def = server
            .mock("GET", "/api/queue/v1/task/abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"provisionerId":"gecko-t","workerType":"t-linux","metadata":{"name":"test-linux/opt-xpcshell"}}"#)
            .create_async()
            .await;
        let _status = server
            .mock("GET", "/api/queue/v1/task/abc/status")
            .with_status(502)
            .create_async()
            .await;

        let provider = TaskclusterProvider::new(&server.url(), 1_000).unwrap();
        let info = provider.task("abc").await.unwrap().unwrap();
        assert_eq!(info.worker_pool, "gecko-t/t-linux");
        assert_eq!(info.state, "unknown");
    }

    #[tokio::test]
    async fn test_unknown_pool_is_none() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/worker-manager/v1/worker-pool/gecko-t/nope")
            .with_status(404)
            .create_async()
            .await;

        let provider = TaskclusterProvider::new(&server.url(), 1_000).unwrap();
        assert!(provider.worker_image("gecko-t/nope").await.unwrap().is_none());
    }
}
