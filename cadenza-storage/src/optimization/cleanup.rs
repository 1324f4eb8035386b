/// Eviction of stored audio payloads
///
/// Two passes free space: a proactive one ranked by a frequency-boosted
/// recency score, run before a write that would not fit, and an emergency one
/// that drops the older half of all candidates after the substrate has
/// already refused a write. Both are best-effort: a deletion that fails is
/// logged and skipped.
use std::sync::Arc;

use cadenza_core::keys::{is_audio_key, is_track_collection};
use cadenza_core::{AccessMetadata, CleanupReport};
use tracing::{debug, info, warn};

use crate::backend::KeyValueStore;
use crate::io::AccessTracker;

pub const ONE_DAY_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// Proactive cleanup frees this multiple of the requested bytes
pub const CLEANUP_SAFETY_MARGIN: f64 = 1.2;

/// Eviction value of an item; lower scores are evicted first.
///
/// Each recorded access pushes the score a full day into the future, so
/// frequency dominates recency.
pub fn eviction_score(meta: &AccessMetadata) -> u64 {
    meta.last_accessed_at_millis
        .saturating_add(u64::from(meta.access_count).saturating_mul(ONE_DAY_MILLIS))
}

/// An item that may be evicted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionCandidate {
    pub key: String,
    pub size: u64,
    pub metadata: AccessMetadata,
}

#[derive(Clone)]
pub struct CleanupCoordinator {
    store: Arc<dyn KeyValueStore>,
    tracker: AccessTracker,
}

impl CleanupCoordinator {
    pub fn new(store: Arc<dyn KeyValueStore>, tracker: AccessTracker) -> Self {
        Self { store, tracker }
    }

    /// Audio payloads that eviction may remove.
    ///
    /// Track collections count toward usage but belong to another writer and
    /// are never evicted.
    pub fn candidates(&self) -> Vec<EvictionCandidate> {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to enumerate substrate keys for cleanup: {}", e);
                return Vec::new();
            }
        };

        keys.into_iter()
            .filter(|key| is_audio_key(key) && !is_track_collection(key))
            .filter_map(|key| {
                let size = match self.store.size_of(&key) {
                    Ok(Some(size)) => size,
                    Ok(None) => return None,
                    Err(e) => {
                        warn!("Failed to size {}: {}", key, e);
                        return None;
                    }
                };
                let metadata = self.tracker.metadata_of(&key);
                Some(EvictionCandidate { key, size, metadata })
            })
            .collect()
    }

    /// Evict lowest-scored items until `required_bytes * 1.2` are freed or
    /// nothing is left to evict
    pub fn perform_cleanup(&self, required_bytes: u64) -> CleanupReport {
        let target = (required_bytes as f64 * CLEANUP_SAFETY_MARGIN).ceil() as u64;
        let mut candidates = self.candidates();
        candidates.sort_by(|a, b| {
            eviction_score(&a.metadata)
                .cmp(&eviction_score(&b.metadata))
                .then_with(|| a.key.cmp(&b.key))
        });

        let mut report = CleanupReport::default();
        for candidate in candidates {
            if report.freed_bytes >= target {
                break;
            }
            self.evict(candidate, &mut report);
        }

        info!(
            "Cleanup freed {} bytes from {} items (target {} bytes)",
            report.freed_bytes,
            report.removed_count(),
            target
        );
        report
    }

    /// Remove the least recently accessed half of all candidates, rounding up,
    /// regardless of access counts
    pub fn emergency_cleanup(&self) -> CleanupReport {
        let mut candidates = self.candidates();
        candidates.sort_by(|a, b| {
            a.metadata
                .last_accessed_at_millis
                .cmp(&b.metadata.last_accessed_at_millis)
                .then_with(|| a.key.cmp(&b.key))
        });

        let to_remove = candidates.len().div_ceil(2);
        let mut report = CleanupReport::default();
        for candidate in candidates.into_iter().take(to_remove) {
            self.evict(candidate, &mut report);
        }

        warn!(
            "Emergency cleanup removed {} items ({} bytes, {} failures)",
            report.removed_count(),
            report.freed_bytes,
            report.failures
        );
        report
    }

    fn evict(&self, candidate: EvictionCandidate, report: &mut CleanupReport) {
        match self.store.delete(&candidate.key) {
            Ok(()) => {
                self.tracker.forget(&candidate.key);
                debug!(
                    "Evicted {} ({} bytes, score {})",
                    candidate.key,
                    candidate.size,
                    eviction_score(&candidate.metadata)
                );
                report.freed_bytes += candidate.size;
                report.removed_keys.push(candidate.key);
            }
            Err(e) => {
                warn!("Failed to evict {}: {}", candidate.key, e);
                report.failures += 1;
            }
        }
    }
}
