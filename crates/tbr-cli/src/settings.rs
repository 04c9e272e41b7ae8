//! Store configuration discovery

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tbr_core::StoreConfig;
use tracing::debug;

/// Config file name looked up in the working directory
pub const LOCAL_CONFIG: &str = "tbr.toml";

/// Config file name inside the user config directory
pub const USER_CONFIG: &str = "config.toml";

/// Resolved configuration and where it came from
#[derive(Debug, Clone)]
pub struct Settings {
    /// Store configuration to use
    pub store: StoreConfig,
    /// Config file that was loaded, if any
    pub source: Option<PathBuf>,
}

/// User config directory for this tool
pub fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "tbr").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Config file candidates in lookup order
pub fn candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(dir) = user_config_dir() {
        paths.push(dir.join(USER_CONFIG));
    }
    paths
}

/// First existing config file
pub fn find_config_file() -> Option<PathBuf> {
    candidates().into_iter().find(|p| p.exists())
}

/// Resolve the store configuration
///
/// An explicit `--config` must exist. Otherwise the first candidate that exists
/// is loaded, falling back to defaults. `--rule-file` overrides the file
/// locations and keeps the remaining settings.
pub fn resolve(config: Option<&Path>, rule_file: Option<&Path>) -> Result<Settings> {
    let source = match config {
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file(),
    };

    let mut store = match source {
        Some(ref path) => {
            debug!("Loading config from {:?}", path);
            StoreConfig::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?
        }
        None => {
            debug!("No config file found, using defaults");
            StoreConfig::default()
        }
    };

    if let Some(path) = rule_file {
        let located = StoreConfig::for_rule_file(path);
        store.rule_file = located.rule_file;
        store.sync_file = located.sync_file;
        store.backup_dir = located.backup_dir;
    }

    store.validate().context("Invalid configuration")?;

    Ok(Settings { store, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_file_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("tbr.toml");
        std::fs::write(&config_path, "backup_retention = 3\n").unwrap();

        let rule_file = temp_dir.path().join("rules.txt");
        let settings = resolve(Some(config_path.as_path()), Some(rule_file.as_path())).unwrap();

        assert_eq!(settings.source, Some(config_path));
        assert_eq!(settings.store.rule_file, rule_file);
        assert_eq!(settings.store.backup_dir, temp_dir.path().join("backups"));
        assert_eq!(settings.store.backup_retention, 3);
    }

    #[test]
    fn test_missing_explicit_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("absent.toml");
        assert!(resolve(Some(missing.as_path()), None).is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("tbr.toml");
        std::fs::write(&config_path, "backup_retention = 0\n").unwrap();

        assert!(resolve(Some(config_path.as_path()), None).is_err());
    }
}
