//! Filesystem primitives used by group operations.
//!
//! Each submodule owns one concern and knows nothing about groups:
//!
//! - [`mapping`]: resolve `(source, destination)` pairs to absolute paths
//! - [`copy`]: interchangeable tree-copy strategies
//! - [`backup`]: timestamped backups with count-based rotation
//! - [`diff`]: recursive comparison with unified-diff rendering
//! - [`command`]: hook commands run relative to the destination root
pub mod backup;
pub mod command;
pub mod copy;
pub mod diff;
pub mod helpers {
    //! Small filesystem helpers shared across resources.
    pub mod fs;
}
pub mod mapping;

use std::fmt;
use std::path::Path;

/// Whether a mapped path is a single file or a directory tree.
///
/// # Examples
///
/// ```
/// use confit::resources::EntryKind;
///
/// assert_eq!(EntryKind::File.to_string(), "file");
/// assert_ne!(EntryKind::File, EntryKind::Directory);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file (or a symlink to one).
    File,
    /// A directory tree.
    Directory,
}

impl EntryKind {
    /// Classify an existing path, following symlinks.
    ///
    /// Returns `None` when nothing exists at `path`.
    #[must_use]
    pub fn of(path: &Path) -> Option<Self> {
        let meta = std::fs::metadata(path).ok()?;
        Some(if meta.is_dir() {
            Self::Directory
        } else {
            Self::File
        })
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}
