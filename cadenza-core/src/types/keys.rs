//! Key namespace shared with the other writers of the substrate.
//!
//! These strings are read by existing records and must stay bit-exact.

/// Prefix of a user's track collection
pub const TRACKS_PREFIX: &str = "tracks_";

/// Global public track index. Owned elsewhere, never written here.
pub const ALL_TRACKS_KEY: &str = "allTracks";

/// Prefix under which migrated payloads are stored
pub const TRACK_AUDIO_PREFIX: &str = "track_audio_";

/// Prefix of access metadata records
pub const META_PREFIX: &str = "__meta_";

/// Prefix of a stored-key audio reference
pub const STORED_REF_PREFIX: &str = "stored:";

pub fn tracks_key(user_id: &str) -> String {
    format!("{}{}", TRACKS_PREFIX, user_id)
}

pub fn track_audio_key(track_id: &str) -> String {
    format!("{}{}", TRACK_AUDIO_PREFIX, track_id)
}

pub fn meta_key(key: &str) -> String {
    format!("{}{}", META_PREFIX, key)
}

pub fn is_meta_key(key: &str) -> bool {
    key.starts_with(META_PREFIX)
}

pub fn stored_reference(key: &str) -> String {
    format!("{}{}", STORED_REF_PREFIX, key)
}

/// Whether `key` holds audio bytes that count against the budget.
///
/// Metadata records live in their own namespace and are never audio-bearing,
/// even though `__meta_track_audio_1` would otherwise contain `audio_`.
pub fn is_audio_key(key: &str) -> bool {
    if is_meta_key(key) {
        return false;
    }
    key.starts_with(TRACKS_PREFIX) || key.contains("audio_") || key.contains("_track_")
}

/// Whether `key` is a track collection owned by the external collaborator
pub fn is_track_collection(key: &str) -> bool {
    key.starts_with(TRACKS_PREFIX)
}
