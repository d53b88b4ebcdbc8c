use crate::error::CollectError;
use crate::progress::TriageProgress;
use crate::report::TriageReport;
use crate::signals::SignalCollector;
use crate::util::extract_task_id;
use crate::verdict::VerdictEngine;

/// Collect signals for a task and run the verdict engine over them.
pub struct Triage {
    collector: SignalCollector,
    engine: VerdictEngine,
    root_url: String,
}

impl Triage {
    pub fn new(collector: SignalCollector, engine: VerdictEngine, root_url: String) -> Self {
        Self {
            collector,
            engine,
            root_url,
        }
    }

    pub async fn run(
        &self,
        task_id_or_url: &str,
        progress: &TriageProgress,
    ) -> Result<TriageReport, CollectError> {
        let task_id = extract_task_id(task_id_or_url);
        tracing::info!(target: "sheriff.triage", stage = "triage.in", task_id = %task_id);

        let signals = self.collector.collect(&task_id, progress).await?;

        progress.step("Determining verdict...");
        let tuple = signals.tuple();
        let verdict = self.engine.decide(tuple);
        progress.complete("Determined verdict");
        progress.finish();

        tracing::info!(
            target: "sheriff.triage",
            stage = "triage.out",
            task_id = %task_id,
            signals = ?tuple,
            verdict = %verdict.verdict,
            confidence = %verdict.confidence
        );

        Ok(TriageReport::new(signals, verdict, &self.root_url))
    }
}
