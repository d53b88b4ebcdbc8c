//! Stable re-exports for consumers (`cli`, `plugins`, and external crates).
//!
//! Prefer importing from `sheriff_core::api` instead of reaching into internal modules.

pub use crate::config::{
    load_default, AppConfig, AzureConfig, LoggingConfig, TaskclusterConfig, TreeherderConfig,
    TriageConfig,
};
pub use crate::error::{CliError, CollectError};
pub use crate::investigate::{compare, investigate, running_workers, sheriff_summary, worker_sbom};
pub use crate::progress::TriageProgress;
pub use crate::report::{
    render_sheriff_summary, render_triage_markdown, SheriffSummary, TaskComparison,
    TaskImageSummary, TriageReport, WorkersReport,
};
pub use crate::signals::{
    ClassificationProvider, CollectedSignals, FailureSearch, FailureSearchProvider, ImageProvider,
    PriorClassification, Providers, RunningWorker, SignalCollector, SimilarFailure, TaskInfo,
    TaskMetadataProvider, WorkerImage, WorkerPoolId,
};
pub use crate::triage::Triage;
pub use crate::util::{extract_task_id, parse_image_version, test_name_from_label};
pub use crate::verdict::{
    decide, is_alpha_pool, strip_alpha_suffix, Classification, Confidence, PoolSuffixes,
    SignalTuple, Verdict, VerdictEngine, VerdictKind, VerdictRules,
};
