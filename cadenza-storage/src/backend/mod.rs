//! Key-value substrates the audio store is built on
//!
//! Every backend is a synchronous store with a finite capacity. A write that
//! would push the backend past that capacity fails with
//! [`SubstrateError::QuotaExceeded`] and leaves the previous value in place.

mod file_backend;
mod memory_backend;
#[cfg(feature = "rocksdb")]
mod rocksdb_backend;

pub use file_backend::FileStore;
pub use memory_backend::MemoryStore;
#[cfg(feature = "rocksdb")]
pub use rocksdb_backend::RocksDbStore;

use std::sync::Arc;

use cadenza_core::{CadenzaError, CadenzaResult, SubstrateBackend, SubstrateConfig};
use thiserror::Error;

/// Failure reported by a substrate operation
#[derive(Error, Debug)]
pub enum SubstrateError {
    #[error("quota exceeded writing {key}: {requested} bytes requested, {available} available")]
    QuotaExceeded {
        key: String,
        requested: u64,
        available: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backend error: {0}")]
    Backend(String),
}

impl SubstrateError {
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, SubstrateError::QuotaExceeded { .. })
    }
}

impl From<SubstrateError> for CadenzaError {
    fn from(err: SubstrateError) -> Self {
        match err {
            SubstrateError::QuotaExceeded { key, requested, .. } => {
                CadenzaError::QuotaExceeded { key, requested }
            }
            SubstrateError::Io(e) => CadenzaError::Io(e),
            SubstrateError::Backend(msg) => CadenzaError::Storage(msg),
        }
    }
}

pub type SubstrateResult<T> = Result<T, SubstrateError>;

/// Capability interface over the shared key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> SubstrateResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &[u8]) -> SubstrateResult<()>;

    /// Remove `key`. Absent keys are not an error.
    fn delete(&self, key: &str) -> SubstrateResult<()>;

    /// Every key currently present, in a stable order
    fn keys(&self) -> SubstrateResult<Vec<String>>;

    /// Size of the value under `key` in bytes.
    /// Default implementation reads the value
    fn size_of(&self, key: &str) -> SubstrateResult<Option<u64>> {
        Ok(self.get(key)?.map(|v| v.len() as u64))
    }

    fn contains(&self, key: &str) -> SubstrateResult<bool> {
        Ok(self.size_of(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> SubstrateResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> SubstrateResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> SubstrateResult<()> {
        (**self).delete(key)
    }

    fn keys(&self) -> SubstrateResult<Vec<String>> {
        (**self).keys()
    }

    fn size_of(&self, key: &str) -> SubstrateResult<Option<u64>> {
        (**self).size_of(key)
    }
}

/// Bytes a single entry occupies against a backend's capacity
pub(crate) fn entry_cost(key: &str, value_len: u64) -> u64 {
    key.len() as u64 + value_len
}

/// Open the substrate described by `config`
pub fn open_substrate(config: &SubstrateConfig) -> CadenzaResult<Arc<dyn KeyValueStore>> {
    match config.backend {
        SubstrateBackend::Memory => Ok(Arc::new(MemoryStore::new(config.capacity_bytes))),
        SubstrateBackend::File => {
            let store = FileStore::open(config.resolved_path(), config.capacity_bytes)?;
            Ok(Arc::new(store))
        }
        #[cfg(feature = "rocksdb")]
        SubstrateBackend::Rocksdb => {
            let store = RocksDbStore::open(&config.resolved_path(), config.capacity_bytes)?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "rocksdb"))]
        SubstrateBackend::Rocksdb => Err(CadenzaError::Configuration(
            "the rocksdb substrate requires building with the `rocksdb` feature".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_converts() {
        let err = SubstrateError::QuotaExceeded {
            key: "track_audio_1".to_string(),
            requested: 10,
            available: 2,
        };
        assert!(err.is_quota_exceeded());

        match CadenzaError::from(err) {
            CadenzaError::QuotaExceeded { key, requested } => {
                assert_eq!(key, "track_audio_1");
                assert_eq!(requested, 10);
            }
            other => panic!("Expected QuotaExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_open_memory_substrate() {
        let config = SubstrateConfig {
            backend: SubstrateBackend::Memory,
            path: None,
            capacity_bytes: 128,
        };
        let store = open_substrate(&config).unwrap();
        store.set("k", b"v").unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn test_open_file_substrate() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = SubstrateConfig {
            backend: SubstrateBackend::File,
            path: Some(dir.path().join("store").to_string_lossy().to_string()),
            capacity_bytes: 1024,
        };
        let store = open_substrate(&config).unwrap();
        store.set("track_audio_1", b"abc").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["track_audio_1".to_string()]);
    }
}
