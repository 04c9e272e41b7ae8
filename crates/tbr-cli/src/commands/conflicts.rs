//! Conflict check command

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tbr_core::{ConflictDetector, StoreConfig};

use super::open_store;

/// Conflicts command arguments
#[derive(Args, Debug)]
pub struct ConflictsArgs {
    /// Extra probe hostname (repeatable, replaces the default probes)
    #[arg(short, long = "probe", value_name = "HOST")]
    pub probes: Vec<String>,

    /// Print conflicts as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute conflicts command
pub fn execute(args: ConflictsArgs, config: &StoreConfig) -> Result<()> {
    let store = open_store(config)?;
    let rules = store.list_rules().context("Failed to read rules")?;

    let detector = if args.probes.is_empty() {
        ConflictDetector::default()
    } else {
        ConflictDetector::with_probes(args.probes)
    };
    let conflicts = detector.find_conflicts(&rules);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&conflicts)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("{} No conflicts found", "✓".green());
        return Ok(());
    }

    println!("{} {} potential conflict(s):", "!".yellow(), conflicts.len());
    for conflict in &conflicts {
        println!(
            "  {} and {} both match {} ({})",
            conflict.pattern_a.cyan(),
            conflict.pattern_b.cyan(),
            conflict.sample.yellow(),
            conflict.kind.as_str()
        );
    }

    Ok(())
}
