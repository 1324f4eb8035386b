//! Space reclamation for the audio budget

pub mod cleanup;

pub use cleanup::{
    eviction_score, CleanupCoordinator, EvictionCandidate, CLEANUP_SAFETY_MARGIN, ONE_DAY_MILLIS,
};
