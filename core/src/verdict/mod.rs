pub mod actions;
pub mod config;
pub mod engine;
pub mod pool;
pub mod types;

pub use actions::recommended_actions;
pub use engine::{decide, VerdictEngine, VerdictRules};
pub use pool::{is_alpha_pool, strip_alpha_suffix, PoolSuffixes, DEFAULT_POOL_SUFFIXES};
pub use types::{
    Classification, Confidence, SignalTuple, UnknownClassification, Verdict, VerdictKind,
};
