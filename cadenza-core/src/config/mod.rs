//! Configuration types for Cadenza

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::CapacityBudget;
use crate::CadenzaError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub budget: CapacityBudget,
    #[serde(default)]
    pub substrate: SubstrateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which key-value substrate backs the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubstrateBackend {
    Memory,
    #[default]
    File,
    Rocksdb,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstrateConfig {
    #[serde(default)]
    pub backend: SubstrateBackend,
    /// Directory for file and RocksDB backends (defaults to the cadenza data dir)
    #[serde(default)]
    pub path: Option<String>,
    /// Hard capacity of the substrate; writes beyond it fail with a quota error
    #[serde(default = "default_capacity_bytes")]
    pub capacity_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_capacity_bytes() -> u64 { 64 * 1024 * 1024 }
fn default_level() -> String { "info".to_string() }

impl Default for SubstrateConfig {
    fn default() -> Self {
        Self {
            backend: SubstrateBackend::default(),
            path: None,
            capacity_bytes: default_capacity_bytes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl SubstrateConfig {
    /// Resolved on-disk location, falling back to `<data dir>/store`
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| crate::system::cadenza_data_dir().join("store"))
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, CadenzaError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| CadenzaError::Configuration(format!("Failed to parse config: {}", e)))?;
    validate(&config)?;
    tracing::debug!("Loaded config from {}", path.as_ref().display());
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), CadenzaError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| CadenzaError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

fn validate(config: &Config) -> Result<(), CadenzaError> {
    let budget = &config.budget;
    if budget.audio_size_limit > budget.max_storage_size {
        return Err(CadenzaError::Configuration(format!(
            "audio_size_limit ({}) exceeds max_storage_size ({})",
            budget.audio_size_limit, budget.max_storage_size
        )));
    }
    if !(0.0..=1.0).contains(&budget.cleanup_threshold) {
        return Err(CadenzaError::Configuration(format!(
            "cleanup_threshold must be within 0.0..=1.0, got {}",
            budget.cleanup_threshold
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AUDIO_SIZE_LIMIT, MAX_STORAGE_SIZE};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.budget.max_storage_size, MAX_STORAGE_SIZE);
        assert_eq!(config.budget.audio_size_limit, AUDIO_SIZE_LIMIT);
        assert_eq!(config.budget.cleanup_threshold, 0.8);

        assert_eq!(config.substrate.backend, SubstrateBackend::File);
        assert_eq!(config.substrate.path, None);
        assert_eq!(config.substrate.capacity_bytes, 64 * 1024 * 1024);

        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_valid_config() {
        let toml_content = r#"
[budget]
max_storage_size = 1048576
audio_size_limit = 262144
cleanup_threshold = 0.5

[substrate]
backend = "memory"
path = "/custom/store"
capacity_bytes = 2097152

[logging]
level = "debug"
json = true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.budget.max_storage_size, 1_048_576);
        assert_eq!(config.budget.audio_size_limit, 262_144);
        assert_eq!(config.budget.cleanup_threshold, 0.5);
        assert_eq!(config.substrate.backend, SubstrateBackend::Memory);
        assert_eq!(config.substrate.resolved_path(), PathBuf::from("/custom/store"));
        assert_eq!(config.substrate.capacity_bytes, 2_097_152);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_partial_config() {
        let toml_content = r#"
[budget]
audio_size_limit = 1024
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = load_config(temp_file.path()).unwrap();

        assert_eq!(config.budget.audio_size_limit, 1024);
        assert_eq!(config.budget.max_storage_size, MAX_STORAGE_SIZE);
        assert_eq!(config.substrate.backend, SubstrateBackend::File);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_invalid_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "this is not valid TOML {{").unwrap();

        match load_config(temp_file.path()).unwrap_err() {
            CadenzaError::Configuration(msg) => assert!(msg.contains("Failed to parse config")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_inconsistent_budget() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            "[budget]\nmax_storage_size = 100\naudio_size_limit = 200\n"
        )
        .unwrap();

        match load_config(temp_file.path()).unwrap_err() {
            CadenzaError::Configuration(msg) => assert!(msg.contains("audio_size_limit")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        match load_config("/nonexistent/path/to/config.toml").unwrap_err() {
            CadenzaError::Io(_) => {}
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = Config::default();
        config.budget.max_storage_size = 4096;
        config.budget.audio_size_limit = 1024;
        config.substrate.backend = SubstrateBackend::Rocksdb;
        config.logging.json = true;

        let temp_file = NamedTempFile::new().unwrap();
        save_config(temp_file.path(), &config).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.budget, config.budget);
        assert_eq!(loaded.substrate.backend, SubstrateBackend::Rocksdb);
        assert!(loaded.logging.json);
    }
}
