//! Timestamped rule file backups with bounded retention

use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

use crate::error::Result;

/// Timestamp format embedded in backup file names
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Length of a formatted stamp, e.g. `20250101_120000`
const STAMP_LEN: usize = 15;

/// Manages `<stem>_backup_<stamp>[_<n>].txt` files in one directory
#[derive(Debug, Clone)]
pub struct BackupManager {
    dir: PathBuf,
    prefix: String,
    retention: usize,
}

/// Ordering key for a backup file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct BackupKey {
    modified: SystemTime,
    created: NaiveDateTime,
    seq: u32,
}

impl BackupManager {
    /// Create a manager for backups of files with the given stem
    pub fn new(dir: impl Into<PathBuf>, stem: &str, retention: usize) -> Self {
        Self {
            dir: dir.into(),
            prefix: format!("{stem}_backup_"),
            retention,
        }
    }

    /// Backup directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of backups kept by [`prune`](Self::prune)
    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Copy `source` into a new backup file and return its path
    ///
    /// Backups taken within the same second get an increasing `_<n>` suffix.
    pub fn create(&self, source: &Path) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let stamp = Local::now().format(STAMP_FORMAT).to_string();
        let next_seq = self
            .entries()?
            .into_iter()
            .filter(|(_, key)| key.created.format(STAMP_FORMAT).to_string() == stamp)
            .map(|(_, key)| key.seq + 1)
            .max();

        let name = match next_seq {
            None => format!("{}{}.txt", self.prefix, stamp),
            Some(seq) => format!("{}{}_{}.txt", self.prefix, stamp, seq),
        };
        let path = self.dir.join(name);

        fs::copy(source, &path)?;
        info!("Created backup {}", path.display());
        Ok(path)
    }

    /// All backups, oldest first
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        Ok(self.entries()?.into_iter().map(|(path, _)| path).collect())
    }

    /// Delete the oldest backups beyond the retention window
    ///
    /// Returns how many files were deleted.
    pub fn prune(&self) -> Result<usize> {
        let entries = self.entries()?;
        let excess = entries.len().saturating_sub(self.retention);

        for (path, _) in entries.iter().take(excess) {
            fs::remove_file(path)?;
            debug!("Removed old backup {}", path.display());
        }

        if excess > 0 {
            info!("Pruned {} old backups, keeping {}", excess, self.retention);
        }
        Ok(excess)
    }

    fn entries(&self) -> Result<Vec<(PathBuf, BackupKey)>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some((created, seq)) = file_name.to_str().and_then(|n| self.parse_name(n)) else {
                continue;
            };

            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }

            let key = BackupKey {
                modified: metadata.modified()?,
                created,
                seq,
            };
            entries.push((entry.path(), key));
        }

        entries.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(entries)
    }

    fn parse_name(&self, name: &str) -> Option<(NaiveDateTime, u32)> {
        let rest = name.strip_prefix(&self.prefix)?.strip_suffix(".txt")?;
        if rest.len() < STAMP_LEN || !rest.is_char_boundary(STAMP_LEN) {
            return None;
        }

        let (stamp, suffix) = rest.split_at(STAMP_LEN);
        let created = NaiveDateTime::parse_from_str(stamp, STAMP_FORMAT).ok()?;
        let seq = match suffix {
            "" => 0,
            s => s.strip_prefix('_')?.parse().ok()?,
        };
        Some((created, seq))
    }
}
