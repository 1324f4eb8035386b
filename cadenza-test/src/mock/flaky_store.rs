//! In-memory substrate with injectable failures
//!
//! Wraps a [`MemoryStore`] and records every call, so tests can assert both on
//! outcomes and on which substrate operations were attempted.
//!
//! # Example
//!
//! ```ignore
//! use cadenza_test::mock::FlakyStore;
//!
//! let store = Arc::new(FlakyStore::new());
//! store.reject_writes_with_prefix("track_audio_");
//! // Every audio write now fails with a quota error
//! ```

use std::sync::Arc;

use cadenza_storage::{KeyValueStore, MemoryStore, SubstrateError, SubstrateResult};
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct Faults {
    /// Writes to keys with these prefixes fail with a quota error
    quota_prefixes: Vec<String>,
    /// Deletes of keys with these prefixes fail with a backend error
    delete_prefixes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FlakyStore {
    inner: Arc<MemoryStore>,
    faults: Arc<RwLock<Faults>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl FlakyStore {
    /// Unbounded store with no faults armed
    pub fn new() -> Self {
        Self::with_capacity(u64::MAX)
    }

    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            inner: Arc::new(MemoryStore::new(capacity)),
            faults: Arc::new(RwLock::new(Faults::default())),
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn reject_writes_with_prefix(&self, prefix: impl Into<String>) {
        self.faults.write().quota_prefixes.push(prefix.into());
    }

    pub fn fail_deletes_with_prefix(&self, prefix: impl Into<String>) {
        self.faults.write().delete_prefixes.push(prefix.into());
    }

    /// Disarm every fault
    pub fn heal(&self) {
        let mut faults = self.faults.write();
        faults.quota_prefixes.clear();
        faults.delete_prefixes.clear();
    }

    /// The wrapped store, bypassing fault injection and call recording
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Get recorded method calls (for verification in tests)
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.read().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.write().clear();
    }

    fn record_call(&self, call: impl Into<String>) {
        self.calls.write().push(call.into());
    }

    fn matches(prefixes: &[String], key: &str) -> bool {
        prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

impl Default for FlakyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> SubstrateResult<Option<Vec<u8>>> {
        self.record_call(format!("get({})", key));
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> SubstrateResult<()> {
        self.record_call(format!("set({}, {} bytes)", key, value.len()));
        if Self::matches(&self.faults.read().quota_prefixes, key) {
            return Err(SubstrateError::QuotaExceeded {
                key: key.to_string(),
                requested: value.len() as u64,
                available: 0,
            });
        }
        self.inner.set(key, value)
    }

    fn delete(&self, key: &str) -> SubstrateResult<()> {
        self.record_call(format!("delete({})", key));
        if Self::matches(&self.faults.read().delete_prefixes, key) {
            return Err(SubstrateError::Backend(format!("injected delete failure for {}", key)));
        }
        self.inner.delete(key)
    }

    fn keys(&self) -> SubstrateResult<Vec<String>> {
        self.inner.keys()
    }

    fn size_of(&self, key: &str) -> SubstrateResult<Option<u64>> {
        self.inner.size_of(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faults_apply_by_prefix() {
        let store = FlakyStore::new();
        store.reject_writes_with_prefix("track_audio_");

        assert!(store.set("track_audio_1", b"x").unwrap_err().is_quota_exceeded());
        store.set("tracks_alice", b"[]").unwrap();

        store.heal();
        store.set("track_audio_1", b"x").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["track_audio_1", "tracks_alice"]);
    }

    #[test]
    fn test_calls_are_recorded() {
        let store = FlakyStore::new();
        store.fail_deletes_with_prefix("keep");
        store.set("keep_me", b"abc").unwrap();

        assert!(store.delete("keep_me").is_err());
        assert!(store.contains("keep_me").unwrap());
        assert_eq!(
            store.get_calls(),
            vec!["set(keep_me, 3 bytes)", "delete(keep_me)"]
        );
    }
}
