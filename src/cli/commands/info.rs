use colored::*;

use crate::cli::output::*;
use crate::service::AudioStore;

pub fn run(store: &AudioStore, json: bool) -> anyhow::Result<()> {
    let info = store.get_storage_info();
    if json {
        return print_json(&info);
    }

    let budget = store.accountant().budget();
    section_header_with_line("Audio Storage");
    tree_items(&[
        ("Used", format_size(info.used)),
        ("Available", format_size(info.available)),
        ("Total", format_size(info.total)),
        ("Usage", format!("{:.1}%", info.usage_percentage)),
        ("Audio items", info.audio_files.to_string()),
        ("Item limit", format_size(budget.audio_size_limit)),
    ]);

    if budget.above_threshold(info.used) {
        println!();
        warning(&format!(
            "Usage is above the {:.0}% cleanup threshold",
            budget.cleanup_threshold * 100.0
        ));
        println!("  Run {} to free space", "cadenza cleanup <bytes>".bold());
    }
    Ok(())
}
