//! CLI commands

pub mod backups;
pub mod completions;
pub mod config;
pub mod conflicts;
pub mod rules;
pub mod template;
pub mod transfer;

use anyhow::{Context, Result};
use clap::Subcommand;
use tbr_core::{RuleStore, StoreConfig};

/// CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the rule file, sync file and backup directory
    Init,

    /// List all rules
    List(rules::ListArgs),

    /// Show rule statistics
    Stats,

    /// Add a host or regex rule
    Add(rules::AddArgs),

    /// Remove a rule by pattern
    Remove(rules::PatternArgs),

    /// Toggle a rule between enabled and disabled
    Toggle(rules::PatternArgs),

    /// Replace the rule file with an empty one (a backup is kept)
    Reset(rules::ResetArgs),

    /// Guided rule creation from templates
    Template(template::TemplateArgs),

    /// Test a regex against a sample hostname
    Test(test::TestArgs),

    /// Export rules to a file
    Export(transfer::ExportArgs),

    /// Import rules from a file
    Import(transfer::ImportArgs),

    /// Check enabled rules for potential overlaps
    Conflicts(conflicts::ConflictsArgs),

    /// List, create, prune or restore rule file backups
    Backups(backups::BackupsArgs),

    /// Configuration management
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Open the store described by `config`
pub fn open_store(config: &StoreConfig) -> Result<RuleStore> {
    RuleStore::open(config.clone())
        .with_context(|| format!("Failed to open rule file {}", config.rule_file.display()))
}
