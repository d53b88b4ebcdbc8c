use crate::config::TriageConfig;

use super::engine::{VerdictEngine, VerdictRules};
use super::pool::PoolSuffixes;

impl From<&TriageConfig> for VerdictRules {
    fn from(cfg: &TriageConfig) -> Self {
        VerdictRules::new(cfg.strong_failure_count)
    }
}

impl From<&TriageConfig> for VerdictEngine {
    fn from(cfg: &TriageConfig) -> Self {
        VerdictEngine::new(cfg.into())
    }
}

impl From<&TriageConfig> for PoolSuffixes {
    fn from(cfg: &TriageConfig) -> Self {
        PoolSuffixes::new(cfg.pool_suffixes.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_builtin_rules() {
        let cfg = TriageConfig::default();
        assert_eq!(VerdictRules::from(&cfg), VerdictRules::default());
        assert_eq!(PoolSuffixes::from(&cfg), PoolSuffixes::default());
    }
}
