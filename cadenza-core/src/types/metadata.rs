//! Access metadata kept beside every stored payload

use serde::{Deserialize, Serialize};

/// Last-access time and access count of one stored key.
///
/// Persisted as JSON under `__meta_<key>`; the key itself is implied by the
/// record's location and is not serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessMetadata {
    #[serde(skip)]
    pub key: String,

    #[serde(rename = "lastAccessed")]
    pub last_accessed_at_millis: u64,

    #[serde(rename = "accessCount")]
    pub access_count: u32,
}

impl AccessMetadata {
    /// The record assumed when none exists or the stored one is unreadable
    pub fn fresh(key: impl Into<String>, now_millis: u64) -> Self {
        Self {
            key: key.into(),
            last_accessed_at_millis: now_millis,
            access_count: 1,
        }
    }

    /// Count one more access at `now_millis`
    pub fn touch(&mut self, now_millis: u64) {
        self.access_count = self.access_count.saturating_add(1);
        self.last_accessed_at_millis = now_millis;
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(key: &str, bytes: &[u8]) -> serde_json::Result<Self> {
        let mut meta: Self = serde_json::from_slice(bytes)?;
        meta.key = key.to_string();
        Ok(meta)
    }
}
