use clap::Args;

use crate::cli::output::*;
use crate::service::AudioStore;

#[derive(Args)]
pub struct CleanupArgs {
    /// Bytes to make room for (20% more is freed)
    #[arg(default_value = "0")]
    pub bytes: u64,

    /// Drop the least recently used half of all payloads
    #[arg(long)]
    pub emergency: bool,
}

pub fn run(args: CleanupArgs, store: &AudioStore, json: bool) -> anyhow::Result<()> {
    let report = if args.emergency {
        store.emergency_cleanup()
    } else {
        store.cleanup(args.bytes)
    };
    if json {
        return print_json(&report);
    }

    if report.removed_keys.is_empty() {
        empty("Nothing was evicted");
    } else {
        success(&format!(
            "Evicted {} items, freeing {}",
            report.removed_count(),
            format_size(report.freed_bytes)
        ));
        for (i, key) in report.removed_keys.iter().enumerate() {
            tree_item(i == report.removed_keys.len() - 1, key, None);
        }
    }
    if report.failures > 0 {
        warning(&format!("{} evictions failed and were skipped", report.failures));
    }
    Ok(())
}
