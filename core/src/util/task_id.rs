//! Task identifier helpers.
//!
//! Sheriffs paste either a bare Taskcluster task id or a full UI link such as
//! `https://firefox-ci-tc.services.mozilla.com/tasks/Xcac5C8gRqiOT13YsVRX8A`.
use std::sync::OnceLock;

use regex::Regex;

fn task_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://[^/]+/(?:tasks|task-group)/([A-Za-z0-9_-]{22})").unwrap()
    })
}

/// Extract the 22-character task id from a Taskcluster URL, or return the
/// input unchanged (trimmed) when it is not a recognised URL.
pub fn extract_task_id(task_id_or_url: &str) -> String {
    let input = task_id_or_url.trim();
    task_url_re()
        .captures(input)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| input.to_string())
}

/// The Treeherder search key for a task label: its last `/` segment.
///
/// `test-windows11-64-24h2/opt-mochitest-browser-chrome-1` → `opt-mochitest-browser-chrome-1`
pub fn test_name_from_label(label: &str) -> &str {
    label.rsplit('/').next().unwrap_or(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_task_url() {
        assert_eq!(
            extract_task_id(
                "https://firefox-ci-tc.services.mozilla.com/tasks/Xcac5C8gRqiOT13YsVRX8A"
            ),
            "Xcac5C8gRqiOT13YsVRX8A"
        );
    }

    #[test]
    fn test_extract_from_task_group_url_with_suffix() {
        assert_eq!(
            extract_task_id(
                "https://firefox-ci-tc.services.mozilla.com/task-group/Axmr36nCRCmF2AmnVJgjVA/runs"
            ),
            "Axmr36nCRCmF2AmnVJgjVA"
        );
    }

    #[test]
    fn test_bare_id_passes_through() {
        assert_eq!(
            extract_task_id(" Xcac5C8gRqiOT13YsVRX8A\n"),
            "Xcac5C8gRqiOT13YsVRX8A"
        );
        assert_eq!(extract_task_id("not-a-url"), "not-a-url");
    }

    #[test]
    fn test_test_name_from_label() {
        assert_eq!(
            test_name_from_label("test-windows11-64-24h2/opt-mochitest-browser-chrome-1"),
            "opt-mochitest-browser-chrome-1"
        );
        assert_eq!(test_name_from_label("build-linux64"), "build-linux64");
        assert_eq!(test_name_from_label("trailing/"), "");
    }
}
