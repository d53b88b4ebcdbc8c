//! Worker pool naming helpers.
//!
//! Pre-production pools carry one of a small set of suffixes, e.g.
//! `gecko-t/win11-64-24h2-alpha` is the staging twin of `gecko-t/win11-64-24h2`.

pub const DEFAULT_POOL_SUFFIXES: [&str; 4] = ["-alpha", "-staging", "-test", "-beta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSuffixes {
    suffixes: Vec<String>,
}

impl PoolSuffixes {
    /// Empty suffixes are dropped; they would match every pool.
    pub fn new<I, S>(suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suffixes: suffixes
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.suffixes
    }

    /// Pool name with the first matching suffix removed from its end.
    /// Only one suffix is ever stripped.
    pub fn strip<'a>(&self, pool: &'a str) -> &'a str {
        self.suffixes
            .iter()
            .find_map(|suffix| pool.strip_suffix(suffix.as_str()))
            .unwrap_or(pool)
    }

    pub fn is_alpha(&self, pool: &str) -> bool {
        self.suffixes.iter().any(|suffix| pool.contains(suffix.as_str()))
    }
}

impl Default for PoolSuffixes {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SUFFIXES)
    }
}

/// Map an alpha/staging pool to its production equivalent.
pub fn strip_alpha_suffix(pool: &str) -> &str {
    DEFAULT_POOL_SUFFIXES
        .iter()
        .find_map(|suffix| pool.strip_suffix(suffix))
        .unwrap_or(pool)
}

pub fn is_alpha_pool(pool: &str) -> bool {
    DEFAULT_POOL_SUFFIXES.iter().any(|suffix| pool.contains(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_alpha_suffix() {
        assert_eq!(
            strip_alpha_suffix("gecko-t/win11-64-24h2-alpha"),
            "gecko-t/win11-64-24h2"
        );
        assert_eq!(
            strip_alpha_suffix("gecko-t/win11-64-24h2-staging"),
            "gecko-t/win11-64-24h2"
        );
        assert_eq!(strip_alpha_suffix("gecko-t/t-linux-beta"), "gecko-t/t-linux");
        assert_eq!(
            strip_alpha_suffix("gecko-t/win11-64-24h2"),
            "gecko-t/win11-64-24h2"
        );
        assert_eq!(strip_alpha_suffix(""), "");
    }

    #[test]
    fn test_suffix_must_be_at_end() {
        assert_eq!(
            strip_alpha_suffix("gecko-t/win11-alpha-gpu"),
            "gecko-t/win11-alpha-gpu"
        );
    }

    #[test]
    fn test_strip_is_idempotent_for_pool_names() {
        for pool in [
            "gecko-t/win11-64-24h2-alpha",
            "gecko-t/win11-64-24h2-test",
            "gecko-t/win11-64-24h2",
            "gecko-t/win10-64-2009-hw",
            "alpha",
            "-alpha",
        ] {
            let once = strip_alpha_suffix(pool);
            assert_eq!(strip_alpha_suffix(once), once, "pool {pool}");
        }
    }

    #[test]
    fn test_only_one_suffix_is_stripped() {
        assert_eq!(strip_alpha_suffix("pool-beta-alpha"), "pool-beta");
        assert_eq!(strip_alpha_suffix("pool-alpha-gpu-alpha"), "pool-alpha-gpu");
    }

    #[test]
    fn test_is_alpha_pool_matches_anywhere() {
        assert!(is_alpha_pool("gecko-t/win11-64-24h2-alpha"));
        assert!(is_alpha_pool("gecko-t/win11-staging-gpu"));
        assert!(!is_alpha_pool("gecko-t/win11-64-24h2"));
    }

    #[test]
    fn test_custom_suffixes() {
        let suffixes = PoolSuffixes::new(["-canary", ""]);
        assert_eq!(suffixes.as_slice().len(), 1);
        assert_eq!(suffixes.strip("gecko-t/linux-canary"), "gecko-t/linux");
        assert_eq!(suffixes.strip("gecko-t/linux-alpha"), "gecko-t/linux-alpha");
        assert!(!suffixes.is_alpha("gecko-t/linux"));
    }

    #[test]
    fn test_default_suffix_order() {
        let suffixes = PoolSuffixes::default();
        assert_eq!(suffixes.as_slice(), &DEFAULT_POOL_SUFFIXES.map(String::from));
        assert_eq!(suffixes.strip("gecko-t/x-test"), strip_alpha_suffix("gecko-t/x-test"));
    }
}
