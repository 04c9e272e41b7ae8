//! Rule store
//!
//! Owns the rule file on disk. Every call re-reads the file, so the store
//! holds no rule state of its own. Mutations follow the same sequence:
//!
//! 1. Copy the current file to a timestamped backup and prune old backups
//! 2. Edit the parsed document and write it back
//! 3. Regenerate the sync file from the enabled rules

mod backup;
mod document;

pub use backup::BackupManager;
pub use document::{
    disabled_pattern, rule_line, section_of, unstorable_reason, RuleDocument, DISABLED_MARKER,
};

use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::rule::{Rule, RuleKind};
use crate::validator;

/// Counts reported by [`RuleStore::stats`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStats {
    /// Enabled host rules
    pub host_count: usize,
    /// Enabled regex rules
    pub regex_count: usize,
    /// All rules, enabled or disabled
    pub total_count: usize,
    /// Active rules
    pub enabled_count: usize,
    /// Inactive rules
    pub disabled_count: usize,
    /// Rule file location
    pub path: PathBuf,
}

/// File-backed rule store
#[derive(Debug, Clone)]
pub struct RuleStore {
    config: StoreConfig,
    backups: BackupManager,
}

/// Timestamp written into file headers
pub(crate) fn header_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

impl RuleStore {
    /// Open a store, creating the rule file, backup directory and sync file as needed
    pub fn open(config: StoreConfig) -> Result<Self> {
        let backups = BackupManager::new(
            config.backup_dir.clone(),
            &config.backup_stem(),
            config.backup_retention,
        );
        let store = Self { config, backups };

        fs::create_dir_all(store.backups.dir())?;
        store.ensure_rule_file()?;
        if !store.config.sync_file.exists() {
            store.update_sync_file()?;
        }

        Ok(store)
    }

    /// Open a store for `path` with the sync file and backups beside it
    pub fn initialize<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(StoreConfig::for_rule_file(path))
    }

    /// Active configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Rule file location
    pub fn path(&self) -> &Path {
        &self.config.rule_file
    }

    /// Sync file location
    pub fn sync_path(&self) -> &Path {
        &self.config.sync_file
    }

    /// All rules in file order
    pub fn list_rules(&self) -> Result<Vec<Rule>> {
        Ok(self.load()?.rules())
    }

    /// Add a rule at the end of its section
    ///
    /// Regex rules must compile. Host rules are stored as given. Patterns the
    /// file would read back differently (leading `#`, bare section headers,
    /// line breaks) are rejected.
    pub fn add_rule(&self, pattern: &str, kind: RuleKind, enabled: bool) -> Result<()> {
        let pattern = pattern.trim();
        if let Some(reason) = unstorable_reason(pattern) {
            return Err(Error::invalid_pattern(pattern, reason));
        }
        if kind == RuleKind::Regex {
            validator::compile(pattern)?;
        }

        self.backup_before_edit()?;

        let mut doc = self.load()?;
        doc.insert(&Rule::new(pattern, kind, enabled))?;
        doc.touch(&header_timestamp());
        self.save(&doc)?;
        self.update_sync_file()?;

        info!("Added {} rule {} (enabled: {})", kind, pattern, enabled);
        Ok(())
    }

    /// Remove every line holding the pattern, enabled or disabled
    ///
    /// Removing a pattern that isn't present is not an error.
    pub fn remove_rule(&self, pattern: &str) -> Result<()> {
        let pattern = pattern.trim();
        self.backup_before_edit()?;

        let mut doc = self.load()?;
        let removed = doc.remove(pattern);
        if removed > 0 {
            doc.touch(&header_timestamp());
        }
        self.save(&doc)?;
        self.update_sync_file()?;

        if removed == 0 {
            debug!("No lines matched {} on remove", pattern);
        } else {
            info!("Removed rule {} ({} lines)", pattern, removed);
        }
        Ok(())
    }

    /// Flip a rule between enabled and disabled
    ///
    /// Returns the new enabled state, or [`Error::NotFound`] when no line
    /// holds the pattern. A backup is taken either way.
    pub fn toggle_rule(&self, pattern: &str) -> Result<bool> {
        let pattern = pattern.trim();
        self.backup_before_edit()?;

        let mut doc = self.load()?;
        let toggled = doc.toggle(pattern)?;
        if toggled.is_some() {
            doc.touch(&header_timestamp());
            self.save(&doc)?;
        }
        self.update_sync_file()?;

        match toggled {
            Some(enabled) => {
                info!("Toggled rule {} (enabled: {})", pattern, enabled);
                Ok(enabled)
            }
            None => Err(Error::NotFound {
                pattern: pattern.to_string(),
            }),
        }
    }

    /// Rule counts
    ///
    /// Host and regex counts cover enabled rules only, the totals cover all.
    pub fn stats(&self) -> Result<RuleStats> {
        let rules = self.list_rules()?;
        let enabled_of = |kind| rules.iter().filter(|r| r.enabled && r.kind == kind).count();
        let enabled_count = rules.iter().filter(|r| r.enabled).count();

        Ok(RuleStats {
            host_count: enabled_of(RuleKind::Host),
            regex_count: enabled_of(RuleKind::Regex),
            total_count: rules.len(),
            enabled_count,
            disabled_count: rules.len() - enabled_count,
            path: self.config.rule_file.clone(),
        })
    }

    /// Copy the rule file into the backup directory
    pub fn create_backup(&self) -> Result<PathBuf> {
        self.ensure_rule_file()?;
        self.backups.create(&self.config.rule_file)
    }

    /// Delete backups beyond the retention window, returning how many were removed
    pub fn cleanup_backups(&self) -> Result<usize> {
        self.backups.prune()
    }

    /// Existing backups, oldest first
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        self.backups.list()
    }

    /// Replace the rule file with the content of `backup`
    ///
    /// The current file is backed up first, so a restore can itself be undone.
    pub fn restore_backup(&self, backup: &Path) -> Result<()> {
        let content = fs::read_to_string(backup)?;

        self.backup_before_edit()?;
        fs::write(&self.config.rule_file, content)?;
        self.update_sync_file()?;

        info!("Restored rule file from {}", backup.display());
        Ok(())
    }

    /// Replace the rule file with an empty default one, after a backup
    pub fn reset(&self) -> Result<()> {
        self.backup_before_edit()?;
        let doc = RuleDocument::with_defaults(&self.config.version, &header_timestamp());
        self.save(&doc)?;
        self.update_sync_file()?;

        info!("Reset rule file {}", self.config.rule_file.display());
        Ok(())
    }

    /// Rewrite the sync file from the enabled rules
    pub fn update_sync_file(&self) -> Result<()> {
        let rules = self.list_rules()?;

        let mut content = String::new();
        content.push_str("# Burp Suite TLS Bypass Rules - Auto-sync File\n");
        content.push_str(&format!("# Last Updated: {}\n", header_timestamp()));
        content.push_str("# This file is auto-generated. Do not edit manually.\n");
        content.push_str("# For authorized testing only\n\n");

        let mut count = 0;
        for rule in rules.iter().filter(|r| r.enabled) {
            content.push_str(&rule.pattern);
            content.push('\n');
            count += 1;
        }

        fs::write(&self.config.sync_file, content)?;
        debug!(
            "Wrote {} enabled patterns to {}",
            count,
            self.config.sync_file.display()
        );
        Ok(())
    }

    fn backup_before_edit(&self) -> Result<()> {
        self.create_backup()?;
        self.cleanup_backups()?;
        Ok(())
    }

    fn ensure_rule_file(&self) -> Result<()> {
        if self.config.rule_file.exists() {
            return Ok(());
        }

        if let Some(parent) = self.config.rule_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let doc = RuleDocument::with_defaults(&self.config.version, &header_timestamp());
        fs::write(&self.config.rule_file, doc.render())?;
        info!("Created rule file {}", self.config.rule_file.display());
        Ok(())
    }

    fn load(&self) -> Result<RuleDocument> {
        self.ensure_rule_file()?;
        let content = fs::read_to_string(&self.config.rule_file)?;
        Ok(RuleDocument::parse(&content))
    }

    fn save(&self, doc: &RuleDocument) -> Result<()> {
        fs::write(&self.config.rule_file, doc.render())?;
        Ok(())
    }
}
