use cadenza_storage::KeyValueStore;
use clap::Args;

use crate::cli::output::*;
use crate::service::AudioStore;
use crate::tracks::AudioReference;

#[derive(Args)]
pub struct ResolveArgs {
    /// Reference as found in a track's audioUrl
    pub reference: String,
}

pub fn run(args: ResolveArgs, store: &AudioStore, json: bool) -> anyhow::Result<()> {
    let resolved = store.resolve_audio_url(&args.reference);
    if json {
        return print_json(&resolved);
    }

    match resolved {
        Some(AudioReference::StoredKey(key)) => {
            let present = store.accountant().substrate().contains(&key).unwrap_or(false);
            tree_items(&[
                ("Kind", "stored".to_string()),
                ("Key", key),
                ("Present", present.to_string()),
            ]);
        }
        Some(AudioReference::External(uri)) => {
            tree_items(&[("Kind", "external".to_string()), ("Source", uri)]);
        }
        Some(reference) => tree_items(&[("Kind", reference.label().to_string())]),
        None => empty("Reference cannot be played"),
    }
    Ok(())
}
