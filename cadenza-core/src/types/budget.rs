//! Capacity budget shared by every stored audio item

use serde::{Deserialize, Serialize};

pub const MIB: u64 = 1024 * 1024;

/// Total bytes available to audio-bearing keys
pub const MAX_STORAGE_SIZE: u64 = 50 * MIB;

/// Largest single payload that may be stored; anything bigger streams
pub const AUDIO_SIZE_LIMIT: u64 = 10 * MIB;

/// Fill level considered "high". Informational only, eviction is driven by the write path.
pub const CLEANUP_THRESHOLD: f64 = 0.8;

/// Fixed capacity limits a store is constructed with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityBudget {
    #[serde(default = "default_max_storage_size")]
    pub max_storage_size: u64,
    #[serde(default = "default_audio_size_limit")]
    pub audio_size_limit: u64,
    #[serde(default = "default_cleanup_threshold")]
    pub cleanup_threshold: f64,
}

fn default_max_storage_size() -> u64 { MAX_STORAGE_SIZE }
fn default_audio_size_limit() -> u64 { AUDIO_SIZE_LIMIT }
fn default_cleanup_threshold() -> f64 { CLEANUP_THRESHOLD }

impl Default for CapacityBudget {
    fn default() -> Self {
        Self {
            max_storage_size: default_max_storage_size(),
            audio_size_limit: default_audio_size_limit(),
            cleanup_threshold: default_cleanup_threshold(),
        }
    }
}

impl CapacityBudget {
    /// Bytes still free given the current usage. Never underflows.
    pub fn available(&self, used: u64) -> u64 {
        self.max_storage_size.saturating_sub(used)
    }

    /// Whether `used` has crossed the cleanup threshold
    pub fn above_threshold(&self, used: u64) -> bool {
        if self.max_storage_size == 0 {
            return true;
        }
        used as f64 / self.max_storage_size as f64 >= self.cleanup_threshold
    }
}
