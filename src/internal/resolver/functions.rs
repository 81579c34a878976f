pub mod file_name;
pub mod probe_target;

pub use file_name::{file_name_from_url, UNKNOWN_FILE_NAME};
pub use probe_target::probe_target;
