//! Mock substrates for testing
//!
//! Provides a wrapper store whose failures can be switched on per key prefix.

mod flaky_store;

pub use flaky_store::FlakyStore;
