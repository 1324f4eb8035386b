pub mod paths;

pub use paths::{cadenza_data_dir, cadenza_home, default_config_path};
