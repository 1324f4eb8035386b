//! Side records kept next to stored payloads

pub mod metadata;

pub use metadata::AccessTracker;
