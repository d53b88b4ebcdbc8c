use std::sync::OnceLock;

use regex::Regex;

fn sbom_version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"-(\d+\.\d+\.\d+)\.md$").unwrap())
}

/// Image version embedded in an SBOM file name, e.g.
/// `.../win11-64-24h2-1.0.8.md` → `1.0.8`.
pub fn parse_image_version(sbom_url: &str) -> Option<String> {
    sbom_version_re()
        .captures(sbom_url.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
