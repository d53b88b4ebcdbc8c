pub mod load;
pub mod types;

pub use load::{get_sheriff_data_dir, load_default, load_from_path};
pub use types::{
    AppConfig, AzureConfig, LoggingConfig, TaskclusterConfig, TreeherderConfig, TriageConfig,
};
