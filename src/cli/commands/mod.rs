pub mod audio;
pub mod cleanup;
pub mod info;
pub mod migrate;
pub mod resolve;
