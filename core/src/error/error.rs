use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("cannot triage: {0}")]
    Collect(#[from] CollectError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid signals: {0}")]
    Signals(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Errors that stop signal collection before the verdict engine runs.
///
/// Sub-signal failures (SBOM lookups, Treeherder searches) never surface
/// here; the collector degrades them to defaults.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("task {task_id} not found: {reason}")]
    TaskNotFound { task_id: String, reason: String },
    #[error("invalid worker pool '{0}': expected <provisioner>/<worker-type>")]
    InvalidWorkerPool(String),
    #[error("provider error: {0}")]
    Provider(#[from] anyhow::Error),
}
