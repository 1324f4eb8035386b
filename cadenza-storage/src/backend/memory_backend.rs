/// In-memory substrate with a hard byte capacity
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{entry_cost, KeyValueStore, SubstrateError, SubstrateResult};

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Vec<u8>>,
    used_bytes: u64,
}

/// HashMap-backed store. Keys and values both count against `capacity`.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
    capacity: u64,
}

impl MemoryStore {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            capacity,
        }
    }

    /// A store that never reports quota exhaustion
    pub fn unbounded() -> Self {
        Self::new(u64::MAX)
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Bytes currently charged against the capacity
    pub fn used_bytes(&self) -> u64 {
        self.inner.read().used_bytes
    }

    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SubstrateResult<Option<Vec<u8>>> {
        Ok(self.inner.read().entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> SubstrateResult<()> {
        let mut inner = self.inner.write();

        let previous = inner
            .entries
            .get(key)
            .map(|v| entry_cost(key, v.len() as u64))
            .unwrap_or(0);
        let requested = entry_cost(key, value.len() as u64);
        let base = inner.used_bytes - previous;

        if base.saturating_add(requested) > self.capacity {
            return Err(SubstrateError::QuotaExceeded {
                key: key.to_string(),
                requested,
                available: self.capacity.saturating_sub(base),
            });
        }

        inner.entries.insert(key.to_string(), value.to_vec());
        inner.used_bytes = base + requested;
        Ok(())
    }

    fn delete(&self, key: &str) -> SubstrateResult<()> {
        let mut inner = self.inner.write();
        if let Some(old) = inner.entries.remove(key) {
            inner.used_bytes -= entry_cost(key, old.len() as u64);
        }
        Ok(())
    }

    fn keys(&self) -> SubstrateResult<Vec<String>> {
        let mut keys: Vec<String> = self.inner.read().entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn size_of(&self, key: &str) -> SubstrateResult<Option<u64>> {
        Ok(self.inner.read().entries.get(key).map(|v| v.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_delete() {
        let store = MemoryStore::unbounded();
        store.set("a", b"hello").unwrap();

        assert_eq!(store.get("a").unwrap(), Some(b"hello".to_vec()));
        assert_eq!(store.size_of("a").unwrap(), Some(5));
        assert!(store.contains("a").unwrap());

        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        // Deleting twice is fine
        store.delete("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_quota_counts_keys_and_values() {
        let store = MemoryStore::new(10);
        store.set("ab", b"12345678").unwrap();
        assert_eq!(store.used_bytes(), 10);

        let err = store.set("c", b"1").unwrap_err();
        match err {
            SubstrateError::QuotaExceeded {
                key,
                requested,
                available,
            } => {
                assert_eq!(key, "c");
                assert_eq!(requested, 2);
                assert_eq!(available, 0);
            }
            other => panic!("Expected QuotaExceeded, got {:?}", other),
        }
        // Rejected write leaves nothing behind
        assert_eq!(store.get("c").unwrap(), None);
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_overwrite_reuses_previous_allowance() {
        let store = MemoryStore::new(10);
        store.set("ab", b"12345678").unwrap();
        store.set("ab", b"87654321").unwrap();
        store.set("ab", b"1").unwrap();
        assert_eq!(store.used_bytes(), 3);
    }

    #[test]
    fn test_keys_are_sorted() {
        let store = MemoryStore::unbounded();
        for key in ["zeta", "alpha", "mid"] {
            store.set(key, b"x").unwrap();
        }
        assert_eq!(store.keys().unwrap(), vec!["alpha", "mid", "zeta"]);
    }
}
