//! Worker image investigation: single-task image facts, task comparison,
//! pool listings and the image-only sheriff summary.

use crate::error::CollectError;
use crate::report::models::taskcluster_task_url;
use crate::report::{ImageVerdict, SheriffSummary, TaskComparison, TaskImageSummary, WorkersReport};
use crate::signals::collector::versions_differ;
use crate::signals::{SignalCollector, WorkerImage, WorkerPoolId};
use crate::util::extract_task_id;

pub async fn investigate(
    collector: &SignalCollector,
    task_id_or_url: &str,
) -> Result<TaskImageSummary, CollectError> {
    let task_id = extract_task_id(task_id_or_url);
    let task = collector.fetch_task(&task_id).await?;
    let (image, note) = collector.worker_image(&task.worker_pool).await;
    Ok(TaskImageSummary::new(task, image, note))
}

pub async fn compare(
    collector: &SignalCollector,
    first: &str,
    second: &str,
) -> Result<TaskComparison, CollectError> {
    let (task1, task2) = tokio::try_join!(
        investigate(collector, first),
        investigate(collector, second)
    )?;
    let image_version_differs =
        versions_differ(task1.image_version.as_deref(), task2.image_version.as_deref());
    Ok(TaskComparison {
        task1,
        task2,
        image_version_differs,
    })
}

pub async fn running_workers(
    collector: &SignalCollector,
    worker_pool: &str,
) -> Result<WorkersReport, CollectError> {
    let pool = WorkerPoolId::parse(worker_pool)?;
    let workers = collector
        .providers()
        .images
        .running_workers(&pool.to_string())
        .await?;
    Ok(WorkersReport::new(workers))
}

pub async fn worker_sbom(
    collector: &SignalCollector,
    worker_pool: &str,
) -> Result<WorkerImage, CollectError> {
    let pool = WorkerPoolId::parse(worker_pool)?;
    collector
        .providers()
        .images
        .worker_image(&pool.to_string())
        .await?
        .ok_or_else(|| {
            CollectError::Provider(anyhow::anyhow!("worker pool {pool} not found"))
        })
}

pub async fn sheriff_summary(
    collector: &SignalCollector,
    task_id_or_url: &str,
    compare_production: bool,
    root_url: &str,
) -> Result<SheriffSummary, CollectError> {
    let task_id = extract_task_id(task_id_or_url);
    let task = collector.fetch_task(&task_id).await?;

    let is_alpha = collector.suffixes().is_alpha(&task.worker_pool);
    let compared_production = compare_production && is_alpha;
    let production_pool =
        compared_production.then(|| collector.suffixes().strip(&task.worker_pool).to_string());

    let production_lookup = async {
        match production_pool.as_deref() {
            Some(pool) => collector.worker_image(pool).await,
            None => (None, None),
        }
    };
    let ((failing, failing_note), (production, production_note)) =
        tokio::join!(collector.worker_image(&task.worker_pool), production_lookup);

    let failing_image_version = failing.as_ref().and_then(|i| i.image_version.clone());
    let production_image_version = production.as_ref().and_then(|i| i.image_version.clone());
    let version_differs = compared_production
        && versions_differ(
            failing_image_version.as_deref(),
            production_image_version.as_deref(),
        );
    let verdict = ImageVerdict::decide(is_alpha, version_differs);

    Ok(SheriffSummary {
        taskcluster_url: taskcluster_task_url(root_url, &task.task_id),
        task_id: task.task_id,
        task_label: task.label,
        state: task.state,
        failing_pool: task.worker_pool,
        failing_image_version,
        compared_production,
        production_pool,
        production_image_version,
        version_differs,
        is_alpha,
        verdict,
        verdict_detail: verdict.detail().to_string(),
        sbom_url: failing.and_then(|i| i.sbom_url),
        degraded_signals: failing_note.into_iter().chain(production_note).collect(),
    })
}
