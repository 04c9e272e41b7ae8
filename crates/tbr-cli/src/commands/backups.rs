//! Backup listing, pruning and restore

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;
use tbr_core::{RuleStore, StoreConfig};

use super::open_store;

/// Backups command arguments
#[derive(Args, Debug)]
pub struct BackupsArgs {
    /// Delete backups beyond the retention window
    #[arg(long)]
    pub prune: bool,

    /// Take a backup of the current rule file first
    #[arg(long, conflicts_with = "restore")]
    pub create: bool,

    /// Restore backup number N from the listing (1 = newest)
    #[arg(long, value_name = "N")]
    pub restore: Option<usize>,
}

/// Execute backups command
pub fn execute(args: BackupsArgs, config: &StoreConfig) -> Result<()> {
    let store = open_store(config)?;

    if let Some(number) = args.restore {
        let backup = numbered(&store, number)?;
        store
            .restore_backup(&backup)
            .with_context(|| format!("Failed to restore {}", backup.display()))?;
        println!("{} Restored {}", "✓".green(), backup.display().to_string().cyan());
    }

    if args.create {
        let path = store.create_backup().context("Failed to create backup")?;
        println!("{} Created {}", "✓".green(), path.display());
    }

    if args.prune {
        let removed = store.cleanup_backups().context("Failed to prune backups")?;
        println!("{} Removed {} old backup(s)", "✓".green(), removed);
    }

    let backups = store.backups().context("Failed to list backups")?;
    println!(
        "Backups in {} (keeping {}):",
        store.config().backup_dir.display().to_string().cyan(),
        store.config().backup_retention
    );
    if backups.is_empty() {
        println!("{}", "  (none)".dimmed());
    }
    for (i, path) in backups.iter().rev().enumerate() {
        println!("{:>4}. {}", i + 1, path.display());
    }

    Ok(())
}

/// Backup at a 1-based position in the newest-first listing
fn numbered(store: &RuleStore, number: usize) -> Result<PathBuf> {
    let backups = store.backups().context("Failed to list backups")?;
    number
        .checked_sub(1)
        .and_then(|i| backups.iter().rev().nth(i))
        .cloned()
        .with_context(|| format!("No backup number {} ({} available)", number, backups.len()))
}
