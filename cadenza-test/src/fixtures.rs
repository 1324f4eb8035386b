//! Test fixtures and data generators

use cadenza_core::keys::tracks_key;
use cadenza_storage::KeyValueStore;
use serde_json::{json, Value};

/// A valid `data:audio/mpeg` payload exactly `len` bytes long.
///
/// The header carries a padding parameter so the base64 body length is always
/// a multiple of four; `len` must be at least 32.
pub fn audio_data_uri(len: usize) -> String {
    const BASE: &str = "data:audio/mpeg;pad=;base64,";
    assert!(len >= BASE.len() + 4, "payload of {} bytes is too small", len);

    let pad = (len - BASE.len()) % 4;
    let header = format!("data:audio/mpeg;pad={};base64,", "0".repeat(pad));
    let mut uri = String::with_capacity(len);
    uri.push_str(&header);
    uri.extend(std::iter::repeat('A').take(len - header.len()));
    uri
}

/// Track whose audio is embedded inline
pub fn inline_track(id: u64, payload_len: usize) -> Value {
    json!({
        "id": id,
        "title": format!("Track {}", id),
        "artist": "Fixture Band",
        "audioUrl": audio_data_uri(payload_len),
        "isPublic": id % 2 == 0,
    })
}

/// Track already migrated to keyed storage
pub fn stored_track(id: u64) -> Value {
    json!({
        "id": id,
        "title": format!("Track {}", id),
        "audioUrl": format!("stored:track_audio_{}", id),
        "audioKey": format!("track_audio_{}", id),
        "isStreaming": false,
    })
}

/// Track that plays from its origin
pub fn streaming_track(id: u64, url: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Track {}", id),
        "audioUrl": url,
        "isStreaming": true,
    })
}

/// Write `tracks` as the user's track collection
pub fn seed_tracks(store: &dyn KeyValueStore, user_id: &str, tracks: &[Value]) {
    let bytes = serde_json::to_vec(tracks).expect("fixture tracks serialize");
    store
        .set(&tracks_key(user_id), &bytes)
        .expect("fixture tracks fit in the store");
}
