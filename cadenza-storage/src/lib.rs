//! Budgeted audio payload storage for Cadenza
//!
//! Layers, leaves first: a [`KeyValueStore`] substrate, the [`AccessTracker`]
//! that keeps per-key access metadata, the [`CleanupCoordinator`] that evicts
//! payloads, and the [`StorageAccountant`] that enforces the capacity budget
//! on every write.

pub mod backend;
pub mod cache;
pub mod clock;
pub mod format;
pub mod io;
pub mod optimization;

pub use backend::{open_substrate, FileStore, KeyValueStore, MemoryStore, SubstrateError, SubstrateResult};
#[cfg(feature = "rocksdb")]
pub use backend::RocksDbStore;
pub use cache::{StorageAccountant, StoreOutcome};
pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{encode_data_uri, is_data_uri, AudioPayload, PayloadError};
pub use io::AccessTracker;
pub use optimization::{eviction_score, CleanupCoordinator, EvictionCandidate, ONE_DAY_MILLIS};
