//! Triage verdict engine.
//!
//! Checks run in a fixed priority order and the first match wins:
//! prior classification, then the image-version signal, then raw failure
//! counts on production branches, then the "no signal" fallbacks.

use super::types::{Classification, Confidence, SignalTuple, Verdict, VerdictKind};

/// Thresholds the engine closes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictRules {
    /// Similar production failures at or above this count are treated as a
    /// code regression, and in the image branch they outweigh a version
    /// mismatch.
    strong_failure_count: u32,
}

impl VerdictRules {
    pub const DEFAULT_STRONG_FAILURE_COUNT: u32 = 3;

    pub fn new(strong_failure_count: u32) -> Self {
        Self {
            strong_failure_count: strong_failure_count.max(1),
        }
    }

    pub fn strong_failure_count(&self) -> u32 {
        self.strong_failure_count
    }
}

impl Default for VerdictRules {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STRONG_FAILURE_COUNT)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VerdictEngine {
    rules: VerdictRules,
}

impl VerdictEngine {
    pub fn new(rules: VerdictRules) -> Self {
        Self { rules }
    }

    pub fn decide(&self, signals: SignalTuple) -> Verdict {
        let SignalTuple {
            is_alpha,
            version_differs,
            autoland_failures: autoland,
            central_failures: central,
            classification_id,
        } = signals;
        let strong = self.rules.strong_failure_count;

        match classification_id {
            Classification::Intermittent | Classification::AutoclassifiedIntermittent => {
                return Verdict::new(
                    VerdictKind::Intermittent,
                    Confidence::High,
                    "already classified as intermittent in Treeherder",
                );
            }
            Classification::Infra => {
                return Verdict::new(
                    VerdictKind::Infra,
                    Confidence::High,
                    "already classified as infrastructure issue in Treeherder",
                );
            }
            Classification::FixedByCommit => {
                return Verdict::new(
                    VerdictKind::CodeRegression,
                    Confidence::High,
                    "classified as fixed by commit - was a real regression",
                );
            }
            Classification::NotClassified
            | Classification::ExpectedFail
            | Classification::IntermittentNeedsFiling => {}
        }

        if is_alpha && version_differs {
            let total = autoland.saturating_add(central);
            if total == 0 {
                return Verdict::new(
                    VerdictKind::ImageRegression,
                    Confidence::High,
                    "failed on alpha pool with different image version, \
                     no similar failures on production branches",
                );
            }
            if total < strong {
                return Verdict::new(
                    VerdictKind::ImageRegression,
                    Confidence::Medium,
                    "failed on alpha pool with different image version, \
                     few similar failures on production (may be newly exposed)",
                );
            }
            // Enough production failures to outweigh the image signal; the
            // count checks below decide.
        }

        if autoland >= strong || central >= strong {
            return Verdict::new(
                VerdictKind::CodeRegression,
                Confidence::High,
                format!(
                    "multiple similar failures found on production branches \
                     (autoland: {autoland}, mozilla-central: {central})"
                ),
            );
        }

        if autoland > 0 || central > 0 {
            return Verdict::new(
                VerdictKind::CodeRegression,
                Confidence::Medium,
                format!(
                    "similar failures found on production branches \
                     (autoland: {autoland}, mozilla-central: {central})"
                ),
            );
        }

        if is_alpha && !version_differs {
            return Verdict::new(
                VerdictKind::NeedsInvestigation,
                Confidence::Low,
                "failed on alpha pool but same image version as production - \
                 could be code or intermittent",
            );
        }

        Verdict::new(
            VerdictKind::NeedsInvestigation,
            Confidence::Low,
            "insufficient signals to determine cause - manual investigation needed",
        )
    }
}

/// Decide with the default rules.
pub fn decide(signals: SignalTuple) -> Verdict {
    VerdictEngine::default().decide(signals)
}
