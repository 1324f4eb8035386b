use std::path::PathBuf;
use std::sync::OnceLock;

// Cache the paths to avoid repeated environment lookups
static CADENZA_HOME: OnceLock<PathBuf> = OnceLock::new();
static CADENZA_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Get the Cadenza home directory
/// Checks CADENZA_HOME environment variable, falls back to ${HOME}/.cadenza
pub fn cadenza_home() -> PathBuf {
    CADENZA_HOME
        .get_or_init(|| {
            if let Ok(path) = std::env::var("CADENZA_HOME") {
                PathBuf::from(path)
            } else {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".cadenza")
            }
        })
        .clone()
}

/// Get the Cadenza data directory
/// Checks CADENZA_DATA_DIR environment variable, falls back to CADENZA_HOME
pub fn cadenza_data_dir() -> PathBuf {
    CADENZA_DATA_DIR
        .get_or_init(|| {
            if let Ok(path) = std::env::var("CADENZA_DATA_DIR") {
                PathBuf::from(path)
            } else {
                cadenza_home()
            }
        })
        .clone()
}

/// Location of the config file when none is given on the command line
pub fn default_config_path() -> PathBuf {
    cadenza_home().join("config.toml")
}
