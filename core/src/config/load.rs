use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default sheriff data directory: ~/.sheriff
pub fn get_sheriff_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".sheriff"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("read {} failed: {e}", path.display()))?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("parse {} failed: {e}", path.display()))?;
    Ok(cfg)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.sheriff/config.toml
    let sheriff_config = get_sheriff_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if sheriff_config.exists() {
        load_from_path(&sheriff_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

/// Environment variable overrides (highest priority after CLI flags).
pub(crate) fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("TASKCLUSTER_ROOT_URL") {
        cfg.taskcluster.root_url = v;
    }
    if let Some(v) = non_empty("SHERIFF_TREEHERDER_URL") {
        cfg.treeherder.base_url = v;
    }
    if let Some(v) = non_empty("SHERIFF_LOG_LEVEL") {
        cfg.logging.level = v;
    }
}
