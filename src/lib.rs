//! Cadenza: capacity-bounded storage for track audio
//!
//! The [`AudioStore`] service is the entry point. It keeps audio payloads in a
//! key-value substrate under a fixed byte budget, migrates inline track audio
//! into keyed storage, and classifies track references for playback.

pub mod cli;
pub mod service;
pub mod tracks;

pub use service::AudioStore;
pub use tracks::{AudioReference, MigrationService, TrackRecord};

pub use cadenza_core::{CadenzaError, CadenzaResult};
