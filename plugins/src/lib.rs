pub mod azure;
pub mod factory;
pub mod http;
pub mod taskcluster;
pub mod treeherder;
