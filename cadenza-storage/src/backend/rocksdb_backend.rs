/// RocksDB substrate
///
/// Stores every key in the default column family. RocksDB itself has no notion
/// of a byte quota, so the store tracks the logical size of its entries and
/// refuses writes beyond `capacity` the same way the other backends do.
use parking_lot::Mutex;
use rocksdb::{IteratorMode, Options, WriteOptions, DB};
use std::path::Path;

use super::{entry_cost, KeyValueStore, SubstrateError, SubstrateResult};

pub struct RocksDbStore {
    db: DB,
    capacity: u64,
    used_bytes: Mutex<u64>,
    write_opts: WriteOptions,
}

impl RocksDbStore {
    pub fn open(path: &Path, capacity: u64) -> SubstrateResult<Self> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Zstd);

        let db = DB::open(&opts, path).map_err(|e| {
            SubstrateError::Backend(format!(
                "Failed to open RocksDB at path: {}. Error: {}",
                path.display(),
                e
            ))
        })?;

        let mut used = 0;
        for item in db.iterator(IteratorMode::Start) {
            let (key, value) = item.map_err(backend_error)?;
            used += key.len() as u64 + value.len() as u64;
        }

        // Keep WAL for durability, skip fsync per write
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(false);
        write_opts.disable_wal(false);

        Ok(Self {
            db,
            capacity,
            used_bytes: Mutex::new(used),
            write_opts,
        })
    }

    pub fn used_bytes(&self) -> u64 {
        *self.used_bytes.lock()
    }

    /// Flush memtables to disk
    pub fn flush(&self) -> SubstrateResult<()> {
        self.db.flush().map_err(backend_error)
    }
}

fn backend_error(e: rocksdb::Error) -> SubstrateError {
    SubstrateError::Backend(e.to_string())
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &str) -> SubstrateResult<Option<Vec<u8>>> {
        self.db.get(key.as_bytes()).map_err(backend_error)
    }

    fn set(&self, key: &str, value: &[u8]) -> SubstrateResult<()> {
        let mut used = self.used_bytes.lock();

        let previous = self
            .size_of(key)?
            .map(|size| entry_cost(key, size))
            .unwrap_or(0);
        let requested = entry_cost(key, value.len() as u64);
        let base = used.saturating_sub(previous);

        if base.saturating_add(requested) > self.capacity {
            return Err(SubstrateError::QuotaExceeded {
                key: key.to_string(),
                requested,
                available: self.capacity.saturating_sub(base),
            });
        }

        self.db
            .put_opt(key.as_bytes(), value, &self.write_opts)
            .map_err(backend_error)?;
        *used = base + requested;
        Ok(())
    }

    fn delete(&self, key: &str) -> SubstrateResult<()> {
        let mut used = self.used_bytes.lock();
        if let Some(size) = self.size_of(key)? {
            self.db
                .delete_opt(key.as_bytes(), &self.write_opts)
                .map_err(backend_error)?;
            *used = used.saturating_sub(entry_cost(key, size));
        }
        Ok(())
    }

    fn keys(&self) -> SubstrateResult<Vec<String>> {
        let mut keys = Vec::new();
        for item in self.db.iterator(IteratorMode::Start) {
            let (key, _value) = item.map_err(backend_error)?;
            if let Ok(key_str) = String::from_utf8(key.to_vec()) {
                keys.push(key_str);
            }
        }
        Ok(keys)
    }

    fn size_of(&self, key: &str) -> SubstrateResult<Option<u64>> {
        Ok(self
            .db
            .get_pinned(key.as_bytes())
            .map_err(backend_error)?
            .map(|v| v.len() as u64))
    }
}
