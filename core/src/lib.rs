//! Triage verdict engine and signal collection for Firefox CI sheriffing.

pub mod api;
pub mod config;
pub mod error;
pub mod investigate;
pub mod progress;
pub mod report;
pub mod signals;
pub mod triage;
pub mod util;
pub mod verdict;
