/// File-backed substrate: one file per key under a directory
///
/// File names are the hex encoding of the key, so any key string is safe on
/// disk. Writes go through a temporary file and a rename, so a failed write
/// never leaves a partial value behind.
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{entry_cost, KeyValueStore, SubstrateError, SubstrateResult};

const ENTRY_EXTENSION: &str = "entry";
const TEMP_EXTENSION: &str = "tmp";

pub struct FileStore {
    root: PathBuf,
    capacity: u64,
    /// Bytes charged against `capacity`; the lock also serializes writers
    used_bytes: Mutex<u64>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`
    pub fn open<P: AsRef<Path>>(root: P, capacity: u64) -> SubstrateResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let store = Self {
            root,
            capacity,
            used_bytes: Mutex::new(0),
        };

        let mut used = 0;
        for key in store.keys()? {
            if let Some(size) = store.size_of(&key)? {
                used += entry_cost(&key, size);
            }
        }
        *store.used_bytes.lock() = used;

        tracing::debug!(
            "Opened file store at {} ({} bytes in use)",
            store.root.display(),
            used
        );
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn used_bytes(&self) -> u64 {
        *self.used_bytes.lock()
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", hex::encode(key.as_bytes()), ENTRY_EXTENSION))
    }

    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SubstrateResult<Option<Vec<u8>>> {
        match fs::read(self.entry_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> SubstrateResult<()> {
        let mut used = self.used_bytes.lock();

        let path = self.entry_path(key);
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

        let temp = path.with_extension(TEMP_EXTENSION);
        if let Err(e) = fs::write(&temp, value).and_then(|_| fs::rename(&temp, &path)) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        *used = base + requested;
        Ok(())
    }

    fn delete(&self, key: &str) -> SubstrateResult<()> {
        let mut used = self.used_bytes.lock();

        let Some(size) = self.size_of(key)? else {
            return Ok(());
        };
        match fs::remove_file(self.entry_path(key)) {
            Ok(()) => {
                *used = used.saturating_sub(entry_cost(key, size));
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> SubstrateResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if let Some(key) = Self::key_from_path(&entry.path()) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn size_of(&self, key: &str) -> SubstrateResult<Option<u64>> {
        match fs::metadata(self.entry_path(key)) {
            Ok(meta) => Ok(Some(meta.len())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
