//! Storage, cleanup and migration statistics types

use serde::{Deserialize, Serialize};

/// Snapshot of budget usage computed by a full scan of audio-bearing keys
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StorageStats {
    pub used: u64,
    pub available: u64,
    pub total: u64,
    /// 0.0 - 100.0
    pub usage_percentage: f64,
    pub audio_item_count: usize,
}

impl StorageStats {
    pub fn new(used: u64, total: u64, audio_item_count: usize) -> Self {
        let usage_percentage = if total == 0 {
            100.0
        } else {
            used as f64 / total as f64 * 100.0
        };
        Self {
            used,
            available: total.saturating_sub(used),
            total,
            usage_percentage,
            audio_item_count,
        }
    }
}

/// Storage report handed to external callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageInfo {
    pub used: u64,
    pub available: u64,
    pub total: u64,
    pub usage_percentage: f64,
    pub audio_files: usize,
}

impl From<StorageStats> for StorageInfo {
    fn from(stats: StorageStats) -> Self {
        Self {
            used: stats.used,
            available: stats.available,
            total: stats.total,
            usage_percentage: stats.usage_percentage,
            audio_files: stats.audio_item_count,
        }
    }
}

/// Result of a guarded store. `should_stream` is always `!stored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreResult {
    pub stored: bool,
    pub should_stream: bool,
}

impl StoreResult {
    pub fn from_stored(stored: bool) -> Self {
        Self {
            stored,
            should_stream: !stored,
        }
    }
}

/// What one eviction pass removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub removed_keys: Vec<String>,
    pub freed_bytes: u64,
    /// Deletions that failed and were skipped
    pub failures: usize,
}

impl CleanupReport {
    pub fn removed_count(&self) -> usize {
        self.removed_keys.len()
    }
}

/// Outcome of migrating one user's track collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub migrated: usize,
    pub failed: usize,
    /// Bytes of inline payload examined
    pub total_size: u64,
}

/// Dry-run view of a track collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationStats {
    pub total_tracks: usize,
    pub needs_migration: usize,
    pub estimated_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_stats_percentage() {
        let stats = StorageStats::new(25, 100, 3);
        assert_eq!(stats.available, 75);
        assert_eq!(stats.usage_percentage, 25.0);

        let over = StorageStats::new(150, 100, 1);
        assert_eq!(over.available, 0);
        assert_eq!(over.usage_percentage, 150.0);
    }

    #[test]
    fn test_storage_info_wire_names() {
        let info = StorageInfo::from(StorageStats::new(1, 4, 2));
        let json = serde_json::to_value(info).unwrap();
        assert_eq!(json["usagePercentage"], 25.0);
        assert_eq!(json["audioFiles"], 2);
    }

    #[test]
    fn test_store_result() {
        assert_eq!(
            StoreResult::from_stored(false),
            StoreResult {
                stored: false,
                should_stream: true
            }
        );
    }
}
