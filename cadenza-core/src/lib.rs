//! Core utilities and types shared across all Cadenza crates

pub mod config;
pub mod error;
pub mod logging;
pub mod system;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, save_config, Config, LoggingConfig, SubstrateBackend, SubstrateConfig};
pub use error::{CadenzaError, CadenzaResult};
pub use logging::init_logging;

pub use types::{
    keys, AccessMetadata, CapacityBudget, CleanupReport, MigrationReport, MigrationStats,
    StorageInfo, StorageStats, StoreResult, AUDIO_SIZE_LIMIT, CLEANUP_THRESHOLD,
    MAX_STORAGE_SIZE, MIB,
};

/// Version information for the Cadenza project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
