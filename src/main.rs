use clap::Parser;
use colored::*;
use std::process;

use cadenza::cli::commands;
use cadenza::cli::{Cli, Commands};
use cadenza::{AudioStore, CadenzaError};
use cadenza_core::init_logging;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<CadenzaError>() {
            Some(CadenzaError::Configuration(_)) => 2,
            Some(CadenzaError::Io(_)) => 3,
            Some(CadenzaError::InvalidInput(_)) | Some(CadenzaError::Serialization(_)) => 4,
            Some(CadenzaError::Storage(_)) | Some(CadenzaError::QuotaExceeded { .. }) => 5,
            Some(CadenzaError::NotFound(_)) => 6,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.load_config()?;
    init_logging(&config.logging)?;

    let store = AudioStore::open(&config)?;
    let json = cli.json;

    match cli.command {
        Commands::Info => commands::info::run(&store, json),
        Commands::Put(args) => commands::audio::put(args, &store, json),
        Commands::Get(args) => commands::audio::get(args, &store, json),
        Commands::Rm(args) => commands::audio::rm(args, &store, json),
        Commands::Migrate(args) => commands::migrate::run(args, &store, json),
        Commands::Check(args) => commands::migrate::check(args, &store, json),
        Commands::Plan(args) => commands::migrate::plan(args, &store, json),
        Commands::Resolve(args) => commands::resolve::run(args, &store, json),
        Commands::Cleanup(args) => commands::cleanup::run(args, &store, json),
    }
}
