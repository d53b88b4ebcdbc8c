pub mod models;
pub mod render;

pub use models::{
    ImageVerdict, SheriffSummary, TaskComparison, TaskImageSummary, TriageReport,
    WorkersReport,
};
pub use render::{render_sheriff_summary, render_triage_markdown};
