use crate::verdict::{recommended_actions, Classification};

use super::models::{SheriffSummary, TriageReport};

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

fn or_unknown(v: Option<&str>) -> &str {
    v.unwrap_or("unknown")
}

fn production_implication(count: u32) -> &'static str {
    if count > 0 {
        "Failing on production"
    } else {
        "Not failing on production"
    }
}

pub fn render_triage_markdown(report: &TriageReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("## Triage Report: {}\n\n", report.task_id));
    out.push_str(&format!("**Test**: {}\n", report.task_label));
    out.push_str(&format!("**Status**: {}\n\n", report.state));

    out.push_str("### Signals\n\n");
    out.push_str("| Signal | Value | Implication |\n");
    out.push_str("|--------|-------|-------------|\n");
    out.push_str(&format!(
        "| Alpha Pool | {} | {} |\n",
        yes_no(report.is_alpha),
        if report.is_alpha {
            "Using new/staging image"
        } else {
            "Production pool"
        }
    ));

    if report.is_alpha {
        out.push_str(&format!(
            "| Image Version Differs | {} ({} vs {}) | {} |\n",
            yes_no(report.version_differs),
            or_unknown(report.failing_image_version.as_deref()),
            or_unknown(report.production_image_version.as_deref()),
            if report.version_differs {
                "Image change detected"
            } else {
                "Same image"
            }
        ));
    }

    if !report.failure_search_skipped {
        out.push_str(&format!(
            "| Similar Failures on autoland | {} | {} |\n",
            report.autoland_failures,
            production_implication(report.autoland_failures)
        ));
        out.push_str(&format!(
            "| Similar Failures on mozilla-central | {} | {} |\n",
            report.mozilla_central_failures,
            production_implication(report.mozilla_central_failures)
        ));
    }

    let triaged =
        Classification::from_id(report.classification_id).is_some_and(Classification::is_triaged);
    out.push_str(&format!(
        "| Treeherder Classification | {} | {} |\n\n",
        report.classification_name,
        if triaged {
            "Already triaged"
        } else {
            "No prior triage"
        }
    ));

    out.push_str(&format!(
        "### Verdict: **{}** ({})\n\n",
        report.verdict,
        report.verdict.description()
    ));
    out.push_str(&format!("**Confidence**: {}\n", report.confidence));
    out.push_str(&format!("**Rationale**: {}\n\n", report.rationale));

    out.push_str("### Recommended Actions\n\n");
    for (idx, action) in recommended_actions(report.verdict).iter().enumerate() {
        out.push_str(&format!("{}. {}\n", idx + 1, action));
    }
    out.push('\n');

    if !report.degraded_signals.is_empty() {
        out.push_str("### Degraded Signals\n\n");
        for note in &report.degraded_signals {
            out.push_str(&format!("- {note}\n"));
        }
        out.push('\n');
    }

    out.push_str("### Links\n\n");
    out.push_str(&format!("- **Taskcluster**: {}\n", report.taskcluster_url));
    if let Some(sbom) = &report.sbom_url {
        out.push_str(&format!("- **SBOM**: {sbom}\n"));
    }

    out
}

pub fn render_sheriff_summary(summary: &SheriffSummary) -> anyhow::Result<String> {
    let mut out = String::new();
    out.push_str("## Sheriff Triage Summary\n\n");
    out.push_str(&format!("**Task**: `{}`\n", summary.task_id));
    out.push_str(&format!("**Test**: `{}`\n", summary.task_label));
    out.push_str(&format!("**Status**: {}\n\n", summary.state));

    out.push_str("### Worker Pool Comparison\n\n");
    out.push_str("| Property | Value |\n");
    out.push_str("|----------|-------|\n");
    out.push_str(&format!("| **Failing Pool** | `{}` |\n", summary.failing_pool));
    out.push_str(&format!(
        "| **Failing Image Version** | {} |\n",
        or_unknown(summary.failing_image_version.as_deref())
    ));

    if summary.compared_production {
        out.push_str(&format!(
            "| **Production Pool** | `{}` |\n",
            or_unknown(summary.production_pool.as_deref())
        ));
        out.push_str(&format!(
            "| **Production Image Version** | {} |\n",
            or_unknown(summary.production_image_version.as_deref())
        ));
        out.push_str(&format!(
            "| **Version Differs** | {} |\n",
            yes_no(summary.version_differs)
        ));
    }

    out.push_str(&format!("\n### Verdict: **{}**\n\n", summary.verdict.title()));
    out.push_str(&format!("{}\n\n", summary.verdict_detail));

    if !summary.degraded_signals.is_empty() {
        out.push_str("### Degraded Signals\n\n");
        for note in &summary.degraded_signals {
            out.push_str(&format!("- {note}\n"));
        }
        out.push('\n');
    }

    out.push_str("### Links\n\n");
    out.push_str(&format!("- **Taskcluster**: {}\n", summary.taskcluster_url));
    if let Some(sbom) = &summary.sbom_url {
        out.push_str(&format!("- **SBOM**: {sbom}\n"));
    }

    out.push_str("\n### Raw Data (JSON)\n\n```json\n");
    out.push_str(&serde_json::to_string_pretty(summary)?);
    out.push_str("\n```\n");

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::models::ImageVerdict;
    use crate::verdict::{Confidence, VerdictKind};
    use chrono::Utc;

    fn report() -> TriageReport {
        TriageReport {
            task_id: "Xcac5C8gRqiOT13YsVRX8A".to_string(),
            task_label: "test-windows11-64-24h2/opt-mochitest-1".to_string(),
            state: "failed".to_string(),
            worker_pool: "gecko-t/win11-64-24h2-alpha".to_string(),
            is_alpha: true,
            failing_image_version: Some("1.0.9".to_string()),
            production_pool: Some("gecko-t/win11-64-24h2".to_string()),
            production_image_version: Some("1.0.8".to_string()),
            version_differs: true,
            failure_search_skipped: false,
            autoland_failures: 0,
            mozilla_central_failures: 0,
            similar_failures: vec![],
            classification_id: 1,
            classification_name: "not classified".to_string(),
            verdict: VerdictKind::ImageRegression,
            confidence: Confidence::High,
            rationale: "failed on alpha pool with different image version".to_string(),
            taskcluster_url: "https://firefox-ci-tc.services.mozilla.com/tasks/Xcac5C8gRqiOT13YsVRX8A"
                .to_string(),
            sbom_url: Some("https://example.com/win11-64-24h2-1.0.9.md".to_string()),
            degraded_signals: vec![],
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_triage_markdown_sections() {
        let md = render_triage_markdown(&report());
        assert!(md.starts_with("## Triage Report: Xcac5C8gRqiOT13YsVRX8A"));
        assert!(md.contains("| Image Version Differs | Yes (1.0.9 vs 1.0.8) | Image change detected |"));
        assert!(md.contains("| Similar Failures on autoland | 0 | Not failing on production |"));
        assert!(md.contains("### Verdict: **IMAGE_REGRESSION**"));
        assert!(md.contains("**Confidence**: High"));
        assert!(md.contains("1. Notify image maintainer"));
        assert!(md.contains("- **SBOM**: https://example.com/win11-64-24h2-1.0.9.md"));
        assert!(!md.contains("Degraded Signals"));
        assert!(md.contains("| Treeherder Classification | not classified | No prior triage |"));
    }

    #[test]
    fn test_triage_markdown_marks_prior_triage() {
        let mut r = report();
        r.classification_id = Classification::Infra.id();
        r.classification_name = Classification::Infra.name().to_string();
        let md = render_triage_markdown(&r);
        assert!(md.contains("| Treeherder Classification | infra | Already triaged |"));
    }

    #[test]
    fn test_triage_markdown_hides_skipped_search_and_shows_degraded() {
        let mut r = report();
        r.is_alpha = false;
        r.failure_search_skipped = true;
        r.degraded_signals = vec!["classification lookup failed: timeout".to_string()];
        let md = render_triage_markdown(&r);
        assert!(!md.contains("Image Version Differs"));
        assert!(!md.contains("Similar Failures on autoland"));
        assert!(md.contains("- classification lookup failed: timeout"));
    }

    #[test]
    fn test_sheriff_summary_embeds_json() {
        let summary = SheriffSummary {
            task_id: "abc".to_string(),
            task_label: "label".to_string(),
            state: "failed".to_string(),
            failing_pool: "gecko-t/win11-64-24h2-alpha".to_string(),
            failing_image_version: None,
            compared_production: true,
            production_pool: Some("gecko-t/win11-64-24h2".to_string()),
            production_image_version: Some("1.0.8".to_string()),
            version_differs: false,
            is_alpha: true,
            verdict: ImageVerdict::NeedsInvestigation,
            verdict_detail: ImageVerdict::NeedsInvestigation.detail().to_string(),
            taskcluster_url: "https://tc/tasks/abc".to_string(),
            sbom_url: None,
            degraded_signals: vec!["image lookup for gecko-t/win11-64-24h2-alpha failed: timeout"
                .to_string()],
        };
        let md = render_sheriff_summary(&summary).unwrap();
        assert!(md.contains("| **Failing Image Version** | unknown |"));
        assert!(md.contains("| **Production Image Version** | 1.0.8 |"));
        assert!(md.contains("### Verdict: **NEEDS INVESTIGATION**"));
        assert!(md.contains("\"verdict\": \"NEEDS INVESTIGATION\""));
        assert!(md.contains("- image lookup for gecko-t/win11-64-24h2-alpha failed: timeout"));
        assert!(md.contains("\"degradedSignals\": ["));
        assert!(md.trim_end().ends_with("```"));
    }
}
