//! User track collections and the audio references they carry

pub mod migration;
pub mod model;
pub mod resolver;

pub use migration::MigrationService;
pub use model::TrackRecord;
pub use resolver::AudioReference;
