//! Store configuration
//!
//! Locations of the rule file, the sync file and the backup directory, with
//! TOML support mirroring the on-disk `tbr.toml`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default rule file name
pub const DEFAULT_RULE_FILE: &str = "tls_bypass_rule.txt";

/// Default sync file name
pub const DEFAULT_SYNC_FILE: &str = "burp_tls_autosync.txt";

/// Default backup directory name
pub const DEFAULT_BACKUP_DIR: &str = "backups";

/// Default number of backups kept
pub const DEFAULT_BACKUP_RETENTION: usize = 10;

/// Rule file format version written into headers and exports
pub const FORMAT_VERSION: &str = "2.0";

/// Paths and limits used by a [`RuleStore`](crate::RuleStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Rule file holding both sections
    pub rule_file: PathBuf,
    /// Derived file with enabled patterns only
    pub sync_file: PathBuf,
    /// Directory for timestamped backups
    pub backup_dir: PathBuf,
    /// Number of backups kept after each mutation
    pub backup_retention: usize,
    /// Version string written into new rule files and exports
    pub version: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            rule_file: PathBuf::from(DEFAULT_RULE_FILE),
            sync_file: PathBuf::from(DEFAULT_SYNC_FILE),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            backup_retention: DEFAULT_BACKUP_RETENTION,
            version: FORMAT_VERSION.to_string(),
        }
    }
}

impl StoreConfig {
    /// Config for a rule file with the sync file and backups beside it
    pub fn for_rule_file<P: AsRef<Path>>(path: P) -> Self {
        let rule_file = path.as_ref().to_path_buf();
        let dir = rule_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self {
            sync_file: dir.join(DEFAULT_SYNC_FILE),
            backup_dir: dir.join(DEFAULT_BACKUP_DIR),
            rule_file,
            ..Self::default()
        }
    }

    /// Config with every path under `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::for_rule_file(dir.as_ref().join(DEFAULT_RULE_FILE))
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| Error::ConfigNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(Error::from)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.rule_file.as_os_str().is_empty() {
            return Err(Error::config_value("rule_file", "Must not be empty"));
        }
        if self.sync_file.as_os_str().is_empty() {
            return Err(Error::config_value("sync_file", "Must not be empty"));
        }
        if self.sync_file == self.rule_file {
            return Err(Error::config_value(
                "sync_file",
                "Must differ from rule_file, it is regenerated on every change",
            ));
        }
        if self.backup_retention == 0 {
            return Err(Error::config_value("backup_retention", "Must be at least 1"));
        }
        Ok(())
    }

    /// File stem used to name backups
    pub fn backup_stem(&self) -> String {
        self.rule_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("rules")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.rule_file, PathBuf::from("tls_bypass_rule.txt"));
        assert_eq!(config.sync_file, PathBuf::from("burp_tls_autosync.txt"));
        assert_eq!(config.backup_retention, 10);
        assert_eq!(config.version, "2.0");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_rule_file_places_siblings() {
        let config = StoreConfig::for_rule_file("/data/rules/custom.txt");
        assert_eq!(config.sync_file, PathBuf::from("/data/rules/burp_tls_autosync.txt"));
        assert_eq!(config.backup_dir, PathBuf::from("/data/rules/backups"));
        assert_eq!(config.backup_stem(), "custom");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = StoreConfig::from_toml("backup_retention = 3\n").unwrap();
        assert_eq!(config.backup_retention, 3);
        assert_eq!(config.rule_file, PathBuf::from(DEFAULT_RULE_FILE));
    }

    #[test]
    fn test_toml_roundtrip() {
        let original = StoreConfig::in_dir("/tmp/tbr");
        let toml_str = original.to_toml().expect("Failed to serialize");
        let parsed = StoreConfig::from_toml(&toml_str).expect("Failed to parse");
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_validation_rejects_zero_retention() {
        let config = StoreConfig {
            backup_retention: 0,
            ..StoreConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigValue { ref key, .. }) if key == "backup_retention"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = StoreConfig::load("/nonexistent/tbr.toml").unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }
}
