use super::types::VerdictKind;

/// Follow-up steps shown to the sheriff for each verdict.
pub fn recommended_actions(verdict: VerdictKind) -> &'static [&'static str] {
    match verdict {
        VerdictKind::ImageRegression => &[
            "Notify image maintainer",
            "Check SBOM for image changes",
            "Consider rolling back image or fixing the issue",
        ],
        VerdictKind::CodeRegression => &[
            "Identify the regressing commit",
            "Consider backout or fix",
            "Star/classify the failures in Treeherder",
        ],
        VerdictKind::Intermittent => &[
            "No action needed if already filed",
            "Check if failure rate is increasing",
        ],
        VerdictKind::Infra => &[
            "Check infrastructure status",
            "Report to RelOps if persistent",
        ],
        VerdictKind::NeedsInvestigation => &[
            "Manual investigation needed",
            "Check task logs for more details",
            "Compare with similar tasks",
        ],
    }
}
