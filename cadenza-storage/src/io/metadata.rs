/// Access metadata persistence for stored payloads
///
/// Metadata is best-effort: a missing or unreadable record reads back as a
/// fresh one, and a failed write is logged and dropped. Neither ever fails the
/// payload operation that triggered it.
use std::sync::Arc;

use cadenza_core::keys::meta_key;
use cadenza_core::AccessMetadata;
use tracing::{debug, warn};

use crate::backend::KeyValueStore;
use crate::clock::Clock;

#[derive(Clone)]
pub struct AccessTracker {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl AccessTracker {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now_millis(&self) -> u64 {
        self.clock.now_millis()
    }

    /// Stored metadata for `key`, or `None` when absent or corrupt
    fn read(&self, key: &str) -> Option<AccessMetadata> {
        let bytes = match self.store.get(&meta_key(key)) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read access metadata for {}: {}", key, e);
                return None;
            }
        };

        match AccessMetadata::from_bytes(key, &bytes) {
            Ok(meta) => Some(meta),
            Err(e) => {
                debug!("Ignoring corrupt access metadata for {}: {}", key, e);
                None
            }
        }
    }

    fn persist(&self, meta: &AccessMetadata) {
        let bytes = match meta.to_bytes() {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode access metadata for {}: {}", meta.key, e);
                return;
            }
        };
        if let Err(e) = self.store.set(&meta_key(&meta.key), &bytes) {
            warn!("Failed to persist access metadata for {}: {}", meta.key, e);
        }
    }

    /// Metadata for `key`, defaulting to a fresh record stamped now
    pub fn metadata_of(&self, key: &str) -> AccessMetadata {
        self.read(key)
            .unwrap_or_else(|| AccessMetadata::fresh(key, self.now_millis()))
    }

    /// Count a read of `key`
    pub fn record_access(&self, key: &str) {
        let now = self.now_millis();
        let mut meta = self.metadata_of(key);
        meta.touch(now);
        self.persist(&meta);
    }

    /// Count a write of `key`. A key without metadata starts at one access.
    pub fn record_write(&self, key: &str, size: u64) {
        let now = self.now_millis();
        let meta = match self.read(key) {
            Some(mut meta) => {
                meta.touch(now);
                meta
            }
            None => AccessMetadata::fresh(key, now),
        };
        debug!(
            "Recorded write of {} ({} bytes, {} accesses)",
            key, size, meta.access_count
        );
        self.persist(&meta);
    }

    /// Drop the metadata record for `key`
    pub fn forget(&self, key: &str) {
        if let Err(e) = self.store.delete(&meta_key(key)) {
            warn!("Failed to remove access metadata for {}: {}", key, e);
        }
    }
}
