pub mod image_version;
pub mod task_id;

pub use image_version::parse_image_version;
pub use task_id::{extract_task_id, test_name_from_label};
