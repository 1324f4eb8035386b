pub mod commands;
pub mod output;

use std::path::PathBuf;

use anyhow::Context;
use cadenza_core::system::default_config_path;
use cadenza_core::{load_config, Config};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cadenza",
    version,
    about = "Capacity-bounded audio payload store",
    long_about = "Cadenza keeps audio payloads in a key-value store under a fixed byte budget, \
                  evicting the least valuable items to make room and moving inline track audio \
                  into keyed storage."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to $CADENZA_HOME/config.toml when present)
    #[arg(short, long, global = true, env = "CADENZA_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Substrate directory, overriding the config
    #[arg(short, long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show budget usage
    Info,

    /// Store an audio file under a key
    Put(commands::audio::PutArgs),

    /// Read a stored payload
    Get(commands::audio::GetArgs),

    /// Remove a stored payload and its metadata
    Rm(commands::audio::RmArgs),

    /// Move a user's inline track audio into keyed storage
    Migrate(commands::migrate::MigrateArgs),

    /// Check whether a user has tracks waiting for migration
    Check(commands::migrate::UserArgs),

    /// Dry-run migration accounting for a user
    Plan(commands::migrate::UserArgs),

    /// Classify a track audio reference
    Resolve(commands::resolve::ResolveArgs),

    /// Evict stored payloads to free space
    Cleanup(commands::cleanup::CleanupArgs),
}

impl Cli {
    /// Effective configuration: the config file (if any) with command-line
    /// overrides applied
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    load_config(&path)
                        .with_context(|| format!("Failed to load config from {}", path.display()))?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(dir) = &self.store {
            config.substrate.path = Some(dir.display().to_string());
        }
        match self.verbose {
            0 => {}
            1 => config.logging.level = "debug".to_string(),
            _ => config.logging.level = "trace".to_string(),
        }
        Ok(config)
    }
}
