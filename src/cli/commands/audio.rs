use std::path::PathBuf;

use anyhow::Context;
use cadenza_core::CadenzaError;
use cadenza_storage::{encode_data_uri, AudioPayload, StoreOutcome};
use clap::Args;
use serde_json::json;

use crate::cli::output::*;
use crate::service::AudioStore;

#[derive(Args)]
pub struct PutArgs {
    /// Storage key, e.g. track_audio_42
    pub key: String,

    /// Raw audio file to store
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Media type recorded in the payload
    #[arg(long, default_value = "audio/mpeg")]
    pub mime: String,
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,

    /// Write the decoded audio here instead of printing the data URI
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct RmArgs {
    pub key: String,
}

pub fn put(args: PutArgs, store: &AudioStore, json: bool) -> anyhow::Result<()> {
    let audio = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let payload = encode_data_uri(&args.mime, &audio);

    let outcome = store.store_audio_detailed(&args.key, payload.as_bytes());
    if json {
        print_json(&json!({
            "key": args.key,
            "stored": outcome.is_stored(),
            "shouldStream": !outcome.is_stored(),
            "outcome": format!("{:?}", outcome),
        }))?;
    }

    match outcome {
        StoreOutcome::Stored { size, evicted } => {
            if !json {
                success(&format!("Stored {} ({})", args.key, format_size(size)));
                if evicted > 0 {
                    info(&format!("Evicted {} items to make room", evicted));
                }
            }
            Ok(())
        }
        StoreOutcome::InvalidKey | StoreOutcome::InvalidFormat(_) => Err(
            CadenzaError::InvalidInput(format!("{} was not stored: {:?}", args.key, outcome))
                .into(),
        ),
        StoreOutcome::Oversize { size, limit } => Err(CadenzaError::InvalidInput(format!(
            "{} is {}, over the {} item limit; stream it instead",
            args.file.display(),
            format_size(size),
            format_size(limit)
        ))
        .into()),
        StoreOutcome::QuotaExceeded => Err(CadenzaError::QuotaExceeded {
            key: args.key,
            requested: payload.len() as u64,
        }
        .into()),
        StoreOutcome::Failed(reason) => Err(CadenzaError::Storage(reason).into()),
    }
}

pub fn get(args: GetArgs, store: &AudioStore, json: bool) -> anyhow::Result<()> {
    let payload = store
        .get_audio_safely(&args.key)
        .ok_or_else(|| CadenzaError::NotFound(args.key.clone()))?;

    match args.output {
        Some(path) => {
            let parsed = AudioPayload::parse(&payload)
                .with_context(|| format!("{} does not hold an audio payload", args.key))?;
            let audio = parsed.decode()?;
            std::fs::write(&path, &audio)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if json {
                print_json(&json!({
                    "key": args.key,
                    "mime": parsed.mime(),
                    "bytes": audio.len(),
                    "output": path,
                }))?;
            } else {
                success(&format!(
                    "Wrote {} of {} to {}",
                    format_size(audio.len() as u64),
                    parsed.mime(),
                    path.display()
                ));
            }
        }
        None => println!("{}", String::from_utf8_lossy(&payload)),
    }
    Ok(())
}

pub fn rm(args: RmArgs, store: &AudioStore, json: bool) -> anyhow::Result<()> {
    store.remove_audio_safely(&args.key);
    if json {
        print_json(&json!({ "key": args.key, "removed": true }))
    } else {
        success(&format!("Removed {}", args.key));
        Ok(())
    }
}
