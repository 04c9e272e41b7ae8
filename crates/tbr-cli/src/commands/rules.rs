//! Rule management commands
//!
//! Listing, statistics, the add/remove/toggle mutations and reset.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use tbr_core::validator::validate_hostname;
use tbr_core::{Error, Rule, RuleKind, StoreConfig};
use tracing::warn;

use super::open_store;

/// Rule kind as accepted on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RuleKindArg {
    /// Exact hostname
    Host,
    /// Regex pattern
    Regex,
}

impl From<RuleKindArg> for RuleKind {
    fn from(kind: RuleKindArg) -> Self {
        match kind {
            RuleKindArg::Host => RuleKind::Host,
            RuleKindArg::Regex => RuleKind::Regex,
        }
    }
}

/// List arguments
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print rules as JSON
    #[arg(long)]
    pub json: bool,
}

/// Add arguments
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Hostname or regex pattern
    pub pattern: String,

    /// Rule kind
    #[arg(short, long, value_enum, default_value = "regex")]
    pub kind: RuleKindArg,

    /// Add the rule disabled
    #[arg(long)]
    pub disabled: bool,
}

/// Arguments for commands that target one pattern
#[derive(Args, Debug)]
pub struct PatternArgs {
    /// Exact pattern text of the rule
    pub pattern: String,
}

/// Reset arguments
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Confirm replacing the rule file with an empty one
    #[arg(long)]
    pub yes: bool,
}

/// Create the store files
pub fn init(config: &StoreConfig) -> Result<()> {
    let existed = config.rule_file.exists();
    let store = open_store(config)?;

    if existed {
        println!("{} Rule file already exists: {}", "!".yellow(), store.path().display());
    } else {
        println!("{} Created rule file {}", "✓".green(), store.path().display().to_string().cyan());
    }
    println!("  Sync file: {}", store.sync_path().display());
    println!("  Backups:   {}", store.config().backup_dir.display());

    Ok(())
}

/// Print every rule
pub fn list(args: ListArgs, config: &StoreConfig) -> Result<()> {
    let store = open_store(config)?;
    let rules = store.list_rules().context("Failed to read rules")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rules)?);
        return Ok(());
    }

    println!("{}", "═".repeat(50).bright_blue());
    println!("{}", " TLS Bypass Rules".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("File: {}", store.path().display().to_string().cyan());
    println!("Total rules: {}", rules.len().to_string().green());
    println!("{}", "─".repeat(50).bright_black());

    if rules.is_empty() {
        println!("{}", "  (empty)".dimmed());
    } else {
        for (i, rule) in rules.iter().enumerate() {
            println!("{:>4}. {}", i + 1, format_rule(rule));
        }
    }

    println!("{}", "═".repeat(50).bright_blue());
    Ok(())
}

/// Print rule statistics
pub fn stats(config: &StoreConfig) -> Result<()> {
    let store = open_store(config)?;
    let stats = store.stats().context("Failed to read rules")?;

    println!("{}", "RULE STATISTICS".cyan());
    println!("{}", "─".repeat(30).cyan());
    println!("{}", format!("Total Host Rules: {}", stats.host_count).yellow());
    println!("{}", format!("Total Regex Rules: {}", stats.regex_count).yellow());
    println!("{}", format!("Total All Rules: {}", stats.total_count).yellow());
    println!("{}", format!("Enabled Rules: {}", stats.enabled_count).green());
    println!("{}", format!("Disabled Rules: {}", stats.disabled_count).red());
    println!("{}", format!("File Path: {}", stats.path.display()).yellow());

    Ok(())
}

/// Add a rule
pub fn add(args: AddArgs, config: &StoreConfig) -> Result<()> {
    let kind = RuleKind::from(args.kind);
    let store = open_store(config)?;

    if kind == RuleKind::Host && !validate_hostname(&args.pattern) {
        warn!("{} is not a valid hostname", args.pattern);
        println!(
            "{} {} does not look like a hostname, adding it anyway",
            "!".yellow(),
            args.pattern
        );
    }

    match store.add_rule(&args.pattern, kind, !args.disabled) {
        Ok(()) => {
            println!("{} Added {} rule {}", "✓".green(), kind, args.pattern.cyan());
            Ok(())
        }
        Err(Error::InvalidPattern { message, .. }) => {
            println!("{} Invalid pattern: {}", "✗".red(), message);
            anyhow::bail!("Rule not added")
        }
        Err(e) => Err(e).context("Failed to add rule"),
    }
}

/// Remove a rule
pub fn remove(args: PatternArgs, config: &StoreConfig) -> Result<()> {
    let store = open_store(config)?;
    let pattern = args.pattern.trim();

    let exists = store
        .list_rules()
        .context("Failed to read rules")?
        .iter()
        .any(|r| r.pattern == pattern);
    if !exists {
        println!("{} Rule not found: {}", "✗".red(), pattern);
        return Ok(());
    }

    store.remove_rule(pattern).context("Failed to remove rule")?;
    println!("{} Removed {}", "✓".green(), pattern.cyan());
    Ok(())
}

/// Flip a rule's enabled state
pub fn toggle(args: PatternArgs, config: &StoreConfig) -> Result<()> {
    let store = open_store(config)?;

    match store.toggle_rule(&args.pattern) {
        Ok(enabled) => {
            let state = if enabled { "enabled".green() } else { "disabled".red() };
            println!("{} {} is now {}", "✓".green(), args.pattern.cyan(), state);
            Ok(())
        }
        Err(Error::NotFound { pattern }) => {
            println!("{} Rule not found: {}", "✗".red(), pattern);
            anyhow::bail!("Nothing to toggle")
        }
        Err(e) => Err(e).context("Failed to toggle rule"),
    }
}

/// Replace the rule file with an empty default one
pub fn reset(args: ResetArgs, config: &StoreConfig) -> Result<()> {
    if !args.yes {
        anyhow::bail!("Reset discards every rule, pass --yes to confirm");
    }

    let store = open_store(config)?;
    store.reset().context("Failed to reset rule file")?;
    println!(
        "{} Reset {} (previous rules kept in {})",
        "✓".green(),
        store.path().display().to_string().cyan(),
        store.config().backup_dir.display()
    );
    Ok(())
}

/// Colored single-line form of a rule
pub fn format_rule(rule: &Rule) -> String {
    let status = if rule.enabled {
        "[ENABLED] ".green()
    } else {
        "[DISABLED]".red()
    };
    let kind = match rule.kind {
        RuleKind::Host => "HOST ".cyan(),
        RuleKind::Regex => "REGEX".magenta(),
    };
    format!("{} {} {}", status, kind, rule.pattern)
}
