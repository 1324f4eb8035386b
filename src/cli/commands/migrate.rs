use clap::Args;
use colored::*;
use serde_json::json;

use crate::cli::output::*;
use crate::service::AudioStore;

#[derive(Args)]
pub struct MigrateArgs {
    /// User whose tracks_<user> collection is migrated
    pub user: String,

    /// Report only whether anything was migrated
    #[arg(long)]
    pub emergency: bool,
}

#[derive(Args)]
pub struct UserArgs {
    pub user: String,
}

pub fn run(args: MigrateArgs, store: &AudioStore, json: bool) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    if args.emergency {
        let migrated = runtime.block_on(store.emergency_migration(&args.user));
        if json {
            return print_json(&json!({ "user": args.user, "migrated": migrated }));
        }
        if migrated {
            success(&format!("Emergency migration moved audio for {}", args.user));
        } else {
            empty(&format!("Nothing was migrated for {}", args.user));
        }
        return Ok(());
    }

    let report = runtime.block_on(store.migrate_user_tracks(&args.user));
    if json {
        return print_json(&report);
    }

    section_header_with_line(&format!("Migration for {}", args.user));
    tree_items(&[
        ("Migrated", report.migrated.to_string().green().to_string()),
        ("Streaming fallback", report.failed.to_string()),
        ("Inline audio examined", format_size(report.total_size)),
    ]);
    if report.failed > 0 {
        println!();
        warning(&format!(
            "{} tracks will stream from their original source",
            report.failed
        ));
    }
    Ok(())
}

pub fn check(args: UserArgs, store: &AudioStore, json: bool) -> anyhow::Result<()> {
    let needed = store.check_migration_needed(&args.user);
    if json {
        return print_json(&json!({ "user": args.user, "migrationNeeded": needed }));
    }
    if needed {
        info(&format!("{} has inline audio waiting for migration", args.user));
    } else {
        success(&format!("{} has nothing to migrate", args.user));
    }
    Ok(())
}

pub fn plan(args: UserArgs, store: &AudioStore, json: bool) -> anyhow::Result<()> {
    let stats = store.get_migration_stats(&args.user);
    if json {
        return print_json(&stats);
    }

    section_header_with_line(&format!("Migration plan for {}", args.user));
    tree_items(&[
        ("Tracks", stats.total_tracks.to_string()),
        ("Needing migration", stats.needs_migration.to_string()),
        ("Estimated size", format_size(stats.estimated_size)),
    ]);

    let available = store.get_storage_info().available;
    if stats.estimated_size > available {
        println!();
        warning(&format!(
            "Only {} is free; cleanup will run during migration",
            format_size(available)
        ));
    }
    Ok(())
}
