/// Budget-enforcing front door to the substrate
///
/// Every audio write goes through [`StorageAccountant::store`], which checks
/// the payload envelope and the per-item limit, makes room with a proactive
/// cleanup when the shared budget would overflow, and recovers once from a
/// substrate quota rejection with an emergency cleanup and a single retry.
use std::sync::Arc;

use cadenza_core::keys::is_audio_key;
use cadenza_core::{CapacityBudget, StorageStats};
use tracing::{debug, info, warn};

use crate::backend::{KeyValueStore, SubstrateError};
use crate::clock::{Clock, SystemClock};
use crate::format::{AudioPayload, PayloadError};
use crate::io::AccessTracker;
use crate::optimization::CleanupCoordinator;

/// Detailed result of a store attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOutcome {
    Stored { size: u64, evicted: usize },
    InvalidKey,
    InvalidFormat(PayloadError),
    Oversize { size: u64, limit: u64 },
    /// The substrate refused the write even after an emergency cleanup
    QuotaExceeded,
    /// The substrate failed for a reason other than quota
    Failed(String),
}

impl StoreOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, StoreOutcome::Stored { .. })
    }
}

pub struct StorageAccountant {
    store: Arc<dyn KeyValueStore>,
    budget: CapacityBudget,
    tracker: AccessTracker,
    cleanup: CleanupCoordinator,
}

impl StorageAccountant {
    pub fn new(store: Arc<dyn KeyValueStore>, budget: CapacityBudget) -> Self {
        Self::with_clock(store, budget, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        budget: CapacityBudget,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let tracker = AccessTracker::new(store.clone(), clock);
        let cleanup = CleanupCoordinator::new(store.clone(), tracker.clone());
        Self {
            store,
            budget,
            tracker,
            cleanup,
        }
    }

    pub fn budget(&self) -> &CapacityBudget {
        &self.budget
    }

    pub fn tracker(&self) -> &AccessTracker {
        &self.tracker
    }

    pub fn cleanup(&self) -> &CleanupCoordinator {
        &self.cleanup
    }

    pub fn substrate(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Store `payload` under `key`, returning whether it was written
    pub fn store(&self, key: &str, payload: &[u8]) -> bool {
        self.store_detailed(key, payload).is_stored()
    }

    pub fn store_detailed(&self, key: &str, payload: &[u8]) -> StoreOutcome {
        if key.is_empty() {
            debug!("Refusing to store payload under an empty key");
            return StoreOutcome::InvalidKey;
        }

        let size = match AudioPayload::parse(payload) {
            Ok(parsed) => parsed.encoded_len(),
            Err(e) => {
                debug!("Refusing to store {}: {}", key, e);
                return StoreOutcome::InvalidFormat(e);
            }
        };

        if size > self.budget.audio_size_limit {
            debug!(
                "Refusing to store {}: {} bytes exceeds the {} byte item limit",
                key, size, self.budget.audio_size_limit
            );
            return StoreOutcome::Oversize {
                size,
                limit: self.budget.audio_size_limit,
            };
        }

        let mut evicted = 0;
        let used = self.current_usage();
        if size > self.budget.available(used) {
            info!(
                "Writing {} ({} bytes) would exceed the budget ({} of {} bytes used), cleaning up",
                key, size, used, self.budget.max_storage_size
            );
            evicted += self.cleanup.perform_cleanup(size).removed_count();
        }

        match self.store.set(key, payload) {
            Ok(()) => {}
            Err(SubstrateError::QuotaExceeded { .. }) => {
                warn!("Substrate rejected {} despite precheck, running emergency cleanup", key);
                evicted += self.cleanup.emergency_cleanup().removed_count();

                match self.store.set(key, payload) {
                    Ok(()) => {}
                    Err(e) => {
                        warn!("Retry of {} failed after emergency cleanup: {}", key, e);
                        return if e.is_quota_exceeded() {
                            StoreOutcome::QuotaExceeded
                        } else {
                            StoreOutcome::Failed(e.to_string())
                        };
                    }
                }
            }
            Err(e) => {
                warn!("Failed to write {}: {}", key, e);
                return StoreOutcome::Failed(e.to_string());
            }
        }

        self.tracker.record_write(key, size);
        StoreOutcome::Stored { size, evicted }
    }

    /// Read `key`, counting the access on a hit. Only audio-bearing keys are
    /// tracked.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.store.get(key) {
            Ok(Some(payload)) => {
                if is_audio_key(key) {
                    self.tracker.record_access(key);
                }
                debug!("Read {} ({} bytes)", key, payload.len());
                Some(payload)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }

    /// Remove `key` and its metadata. Absent keys are ignored.
    pub fn delete(&self, key: &str) {
        if let Err(e) = self.store.delete(key) {
            warn!("Failed to delete {}: {}", key, e);
            return;
        }
        self.tracker.forget(key);
    }

    /// Bytes used by audio-bearing keys, by full scan of the substrate
    pub fn current_usage(&self) -> u64 {
        self.audio_items().iter().map(|(_, size)| size).sum()
    }

    pub fn stats(&self) -> StorageStats {
        let items = self.audio_items();
        let used = items.iter().map(|(_, size)| size).sum();
        StorageStats::new(used, self.budget.max_storage_size, items.len())
    }

    fn audio_items(&self) -> Vec<(String, u64)> {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to enumerate substrate keys: {}", e);
                return Vec::new();
            }
        };

        keys.into_iter()
            .filter(|key| is_audio_key(key))
            .filter_map(|key| match self.store.size_of(&key) {
                Ok(Some(size)) => Some((key, size)),
                Ok(None) => None,
                Err(e) => {
                    warn!("Failed to size {}: {}", key, e);
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;
    use crate::clock::ManualClock;
    use crate::format::encode_data_uri;
    use cadenza_core::MIB;
    use pretty_assertions::assert_eq;

    fn accountant(budget: CapacityBudget) -> (StorageAccountant, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::unbounded());
        let accountant =
            StorageAccountant::with_clock(store.clone(), budget, Arc::new(ManualClock::new(0)));
        (accountant, store)
    }

    /// Valid payload of exactly `len` encoded bytes (len >= 25)
    fn payload_of(len: usize) -> String {
        // Pad the header so the base64 body stays a multiple of four
        let pad = (len - "data:audio/wav;p=;base64,".len()) % 4;
        let header = format!("data:audio/wav;p={};base64,", "0".repeat(pad));
        format!("{}{}", header, "A".repeat(len - header.len()))
    }

    fn small_budget() -> CapacityBudget {
        CapacityBudget {
            max_storage_size: 1_000,
            audio_size_limit: 400,
            cleanup_threshold: 0.8,
        }
    }

    #[test]
    fn test_round_trip_counts_accesses() {
        let (accountant, _store) = accountant(CapacityBudget::default());
        let payload = encode_data_uri("audio/mpeg", b"\xff\xfb\x90\x64 frame");

        assert!(accountant.store("track_audio_k1", payload.as_bytes()));
        assert_eq!(accountant.get("track_audio_k1"), Some(payload.into_bytes()));
        assert_eq!(accountant.tracker().metadata_of("track_audio_k1").access_count, 2);
    }

    #[test]
    fn test_reading_other_keys_leaves_no_metadata() {
        let (accountant, store) = accountant(CapacityBudget::default());
        store.set("settings", b"{\"volume\":7}").unwrap();

        assert_eq!(accountant.get("settings"), Some(b"{\"volume\":7}".to_vec()));
        assert_eq!(accountant.get("settings"), Some(b"{\"volume\":7}".to_vec()));
        assert_eq!(store.keys().unwrap(), vec!["settings"]);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let (accountant, store) = accountant(CapacityBudget::default());
        let payload = encode_data_uri("audio/wav", b"RIFF");

        assert_eq!(
            accountant.store_detailed("", payload.as_bytes()),
            StoreOutcome::InvalidKey
        );
        assert_eq!(
            accountant.store_detailed("track_audio_1", b"RIFF...."),
            StoreOutcome::InvalidFormat(PayloadError::NotDataUri)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_oversize_is_refused_without_writing() {
        let (accountant, store) = accountant(small_budget());
        let payload = payload_of(401);

        match accountant.store_detailed("track_audio_1", payload.as_bytes()) {
            StoreOutcome::Oversize { size, limit } => {
                assert_eq!(size, payload.len() as u64);
                assert_eq!(limit, 400);
            }
            other => panic!("Expected Oversize, got {:?}", other),
        }
        assert!(store.is_empty());
        assert_eq!(accountant.get("track_audio_1"), None);
    }

    #[test]
    fn test_precheck_runs_cleanup() {
        let (accountant, store) = accountant(small_budget());
        // 3 items of 300 bytes: 900 of 1000 used
        for i in 0..3 {
            let payload = payload_of(300);
            assert!(accountant.store(&format!("track_audio_{}", i), payload.as_bytes()));
        }
        assert_eq!(accountant.current_usage(), 900);

        let payload = payload_of(200);
        match accountant.store_detailed("track_audio_new", payload.as_bytes()) {
            // 200 * 1.2 = 240 -> one 300 byte item goes
            StoreOutcome::Stored { size, evicted } => {
                assert_eq!(size, 200);
                assert_eq!(evicted, 1);
            }
            other => panic!("Expected Stored, got {:?}", other),
        }
        assert_eq!(accountant.current_usage(), 800);
        assert!(!store.contains("track_audio_0").unwrap());
    }

    #[test]
    fn test_stats_count_only_audio_keys() {
        let (accountant, store) = accountant(CapacityBudget::default());
        store.set("settings", &[0; 100]).unwrap();
        store.set("tracks_bob", &[b' '; 50]).unwrap();
        let payload = encode_data_uri("audio/mpeg", &[1; 30]);
        assert!(accountant.store("track_audio_9", payload.as_bytes()));

        let stats = accountant.stats();
        assert_eq!(stats.audio_item_count, 2);
        assert_eq!(stats.used, 50 + payload.len() as u64);
        assert_eq!(stats.total, 50 * MIB);
        assert_eq!(stats.available, 50 * MIB - stats.used);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (accountant, store) = accountant(CapacityBudget::default());
        let payload = encode_data_uri("audio/mpeg", b"abc");
        assert!(accountant.store("track_audio_1", payload.as_bytes()));
        assert!(store.contains("__meta_track_audio_1").unwrap());

        accountant.delete("track_audio_1");
        accountant.delete("track_audio_1");
        assert!(store.is_empty());
    }
}
