use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Step progress for a triage run, drawn on stderr.
///
/// Disabled (hidden) when the caller wants machine-readable output only.
pub struct TriageProgress {
    bar: ProgressBar,
    enabled: bool,
}

impl TriageProgress {
    pub const TRIAGE_STEPS: u64 = 5;

    pub fn new(total_steps: u64, enabled: bool) -> Self {
        if !enabled {
            return Self::hidden();
        }

        let bar = ProgressBar::new(total_steps);
        let style = ProgressStyle::default_bar()
            .template("  {spinner:.green} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar, enabled: true }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Announce the step currently running.
    pub fn step(&self, msg: &str) {
        if self.enabled {
            self.bar.set_message(msg.to_string());
        }
    }

    /// Mark one step done.
    pub fn complete(&self, msg: &str) {
        if self.enabled {
            self.bar.inc(1);
            self.bar.set_message(msg.to_string());
        }
    }

    pub fn finish(&self) {
        if self.enabled {
            self.bar.finish_and_clear();
        }
    }
}

impl Drop for TriageProgress {
    fn drop(&mut self) {
        if self.enabled && !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
