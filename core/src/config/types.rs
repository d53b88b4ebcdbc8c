use serde::{Deserialize, Serialize};

pub const DEFAULT_TASKCLUSTER_ROOT_URL: &str = "https://firefox-ci-tc.services.mozilla.com";
pub const DEFAULT_TREEHERDER_URL: &str = "https://treeherder.mozilla.org";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub taskcluster: TaskclusterConfig,

    #[serde(default)]
    pub treeherder: TreeherderConfig,

    #[serde(default)]
    pub azure: AzureConfig,

    #[serde(default)]
    pub triage: TriageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "warn" or "sheriff_plugins=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskclusterConfig {
    #[serde(default = "default_taskcluster_root_url")]
    pub root_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_taskcluster_root_url() -> String {
    DEFAULT_TASKCLUSTER_ROOT_URL.to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

impl Default for TaskclusterConfig {
    fn default() -> Self {
        Self {
            root_url: default_taskcluster_root_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeherderConfig {
    #[serde(default = "default_treeherder_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How many recent pushes per repo to scan for similar failures.
    #[serde(default = "default_push_limit")]
    pub push_limit: u32,

    /// Production branches searched for similar failures.
    #[serde(default = "default_search_repos")]
    pub search_repos: Vec<String>,

    /// Repos searched, in order, for the job's prior classification.
    #[serde(default = "default_classification_repos")]
    pub classification_repos: Vec<String>,

    /// Treeherder rejects requests without a User-Agent.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_treeherder_url() -> String {
    DEFAULT_TREEHERDER_URL.to_string()
}

fn default_push_limit() -> u32 {
    50
}

fn default_search_repos() -> Vec<String> {
    vec!["autoland".to_string(), "mozilla-central".to_string()]
}

fn default_classification_repos() -> Vec<String> {
    vec![
        "autoland".to_string(),
        "mozilla-central".to_string(),
        "try".to_string(),
    ]
}

fn default_user_agent() -> String {
    concat!("sheriff-triage/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Default for TreeherderConfig {
    fn default() -> Self {
        Self {
            base_url: default_treeherder_url(),
            timeout_ms: default_timeout_ms(),
            push_limit: default_push_limit(),
            search_repos: default_search_repos(),
            classification_repos: default_classification_repos(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Name or path of the Azure CLI binary.
    #[serde(default = "default_az_bin")]
    pub az_bin: String,
}

fn default_az_bin() -> String {
    "az".to_string()
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            az_bin: default_az_bin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    #[serde(default = "default_strong_failure_count")]
    pub strong_failure_count: u32,

    /// Checked in order; the first suffix found at the end of a pool name is
    /// stripped to find its production twin.
    #[serde(default = "default_pool_suffixes")]
    pub pool_suffixes: Vec<String>,
}

fn default_strong_failure_count() -> u32 {
    3
}

fn default_pool_suffixes() -> Vec<String> {
    vec![
        "-alpha".to_string(),
        "-staging".to_string(),
        "-test".to_string(),
        "-beta".to_string(),
    ]
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            strong_failure_count: default_strong_failure_count(),
            pool_suffixes: default_pool_suffixes(),
        }
    }
}
