/// Track records as stored in a user's `tracks_<userId>` collection
///
/// Only the audio-related fields are interpreted here. Everything else belongs
/// to the application that owns the collection and is carried through a
/// rewrite untouched.
use cadenza_core::keys::STORED_REF_PREFIX;
use cadenza_storage::is_data_uri;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    /// String or number, depending on who created the track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_streaming: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_size: Option<u64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrackRecord {
    /// Identifier usable in a storage key
    pub fn track_id(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.is_streaming.unwrap_or(false)
    }

    /// The inline data URI, if the audio is still embedded in the record
    pub fn inline_payload(&self) -> Option<&str> {
        self.audio_url.as_deref().filter(|url| is_data_uri(url))
    }

    pub fn is_stored(&self) -> bool {
        self.audio_url
            .as_deref()
            .is_some_and(|url| url.starts_with(STORED_REF_PREFIX))
    }

    /// Inline audio that has neither been stored nor given up on
    pub fn needs_migration(&self) -> bool {
        self.inline_payload().is_some() && !self.is_streaming()
    }
}

/// Parse a track collection. Returns `None` when the JSON is not an array of
/// objects.
pub fn parse_collection(bytes: &[u8]) -> Option<Vec<TrackRecord>> {
    serde_json::from_slice(bytes).ok()
}
