pub mod client;
pub mod provider;

pub use client::{Job, Push, TreeherderClient};
pub use provider::TreeherderProvider;
