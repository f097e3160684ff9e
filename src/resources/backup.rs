//! Timestamped backups of items about to be replaced, with count-based
//! rotation.
//!
//! A backup of `path` is the same item renamed to `path.ba.<timestamp>`,
//! where the timestamp is the local modification time of the item being
//! replaced, formatted as [`TIMESTAMP_FORMAT`].  Rotation lists the siblings
//! following that convention and removes the oldest by modification time.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local, NaiveDateTime};

use super::helpers::fs::remove_path;
use crate::error::GroupError;

/// Infix separating the original name from the timestamp.
pub const BACKUP_MARKER: &str = ".ba.";

/// `strftime` format of the timestamp suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";

/// Renames items out of the way and keeps at most `max_backups` of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupRotator {
    max_backups: Option<usize>,
}

impl BackupRotator {
    /// Create a rotator; `None` keeps every backup.
    #[must_use]
    pub const fn new(max_backups: Option<usize>) -> Self {
        Self { max_backups }
    }

    /// Move the item at `path` to its backup name, then evict old backups.
    ///
    /// Returns the backup path, or `None` when nothing exists at `path`.
    /// A dangling symlink counts as an existing item.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::BackupCollision`] if a backup with the same
    /// timestamp already exists (nothing is changed in that case), and
    /// [`GroupError::Io`] if the rename or an eviction fails.
    pub fn backup_if_exists(&self, path: &Path) -> Result<Option<PathBuf>, GroupError> {
        let Ok(link_meta) = path.symlink_metadata() else {
            return Ok(None);
        };
        let modified = fs::metadata(path)
            .unwrap_or(link_meta)
            .modified()
            .map_err(|e| GroupError::io(path, e))?;

        let target = backup_path(path, modified);
        if target.symlink_metadata().is_ok() {
            return Err(GroupError::BackupCollision { path: target });
        }
        fs::rename(path, &target).map_err(|e| GroupError::io(path, e))?;

        if let Some(max) = self.max_backups {
            Self::evict(path, max)?;
        }
        Ok(Some(target))
    }

    fn evict(path: &Path, max: usize) -> Result<(), GroupError> {
        let backups = list_backups(path)?;
        let excess = backups.len().saturating_sub(max);
        for old in backups.iter().take(excess) {
            remove_path(old).map_err(|e| GroupError::io(old, e))?;
        }
        Ok(())
    }
}

/// The backup name of `path` for an item last modified at `modified`.
#[must_use]
pub fn backup_path(path: &Path, modified: SystemTime) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(BACKUP_MARKER);
    name.push(format_timestamp(modified));
    path.with_file_name(name)
}

/// Format `time` in local time using [`TIMESTAMP_FORMAT`].
#[must_use]
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Every existing backup of `path`, oldest modification time first.
///
/// Only siblings whose suffix parses as a timestamp are included, so
/// `vimrc.ba.notes` is never mistaken for a backup.
///
/// # Errors
///
/// Returns [`GroupError::Io`] if the parent directory cannot be listed.
pub fn list_backups(path: &Path) -> Result<Vec<PathBuf>, GroupError> {
    let Some(base) = path.file_name() else {
        return Ok(Vec::new());
    };
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut stem = base.to_os_string();
    stem.push(BACKUP_MARKER);
    let prefix = stem.as_encoded_bytes();

    let mut found: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(parent).map_err(|e| GroupError::io(parent, e))? {
        let entry = entry.map_err(|e| GroupError::io(parent, e))?;
        let name = entry.file_name();
        let Some(suffix) = name
            .as_encoded_bytes()
            .strip_prefix(prefix)
            .and_then(|s| std::str::from_utf8(s).ok())
        else {
            continue;
        };
        if NaiveDateTime::parse_from_str(suffix, TIMESTAMP_FORMAT).is_err() {
            continue;
        }
        let backup = entry.path();
        let modified = backup
            .symlink_metadata()
            .and_then(|m| m.modified())
            .map_err(|e| GroupError::io(&backup, e))?;
        found.push((modified, backup));
    }
    found.sort();
    Ok(found.into_iter().map(|(_, p)| p).collect())
}
