pub mod collector;
pub mod models;
pub mod r#trait;

pub use collector::{CollectedSignals, Providers, SignalCollector, AUTOLAND, MOZILLA_CENTRAL};
pub use models::{
    FailureSearch, PriorClassification, RunningWorker, SimilarFailure, TaskInfo, WorkerImage, WorkerPoolId,
};
pub use r#trait::{
    ClassificationProvider, FailureSearchProvider, ImageProvider, TaskMetadataProvider,
};
