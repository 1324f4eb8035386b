//! Tracing subscriber setup shared by the binary and tests

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{CadenzaError, CadenzaResult};

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set, then `CADENZA_LOG`, then the configured level.
pub fn init_logging(config: &LoggingConfig) -> CadenzaResult<()> {
    let log_level = std::env::var("CADENZA_LOG").unwrap_or_else(|_| config.level.clone());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| CadenzaError::Configuration(format!("Failed to install logger: {}", e)))
}
