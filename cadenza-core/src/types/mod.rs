/// Core types shared across all Cadenza crates
pub mod budget;
pub mod keys;
pub mod metadata;
pub mod stats;

// Re-export commonly used types at module level
pub use budget::{CapacityBudget, AUDIO_SIZE_LIMIT, CLEANUP_THRESHOLD, MAX_STORAGE_SIZE, MIB};
pub use metadata::AccessMetadata;
pub use stats::{
    CleanupReport, MigrationReport, MigrationStats, StorageInfo, StorageStats, StoreResult,
};
