pub mod client;
pub mod provider;

pub use client::TaskclusterClient;
pub use provider::TaskclusterProvider;
