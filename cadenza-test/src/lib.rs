//! Test utilities for the Cadenza workspace
//!
//! Shared fixtures (sized audio payloads, track collections) and a mock
//! substrate that misbehaves on demand, so failure paths can be driven
//! deterministically.

pub mod fixtures;
pub mod mock;

pub use fixtures::{audio_data_uri, inline_track, seed_tracks, stored_track, streaming_track};
pub use mock::FlakyStore;

/// Initialize test logging (safe to call from every test)
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
