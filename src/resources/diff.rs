//! Recursive comparison of a source and destination path.
//!
//! [`compare`] walks both sides and returns every difference; [`differs`]
//! wraps it and optionally reports each difference through a [`Log`],
//! rendering modified text files as unified diffs.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use super::EntryKind;
use crate::error::GroupError;
use crate::logging::Log;

/// How a single path differs between source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Present in the source only.
    OnlyInSource,
    /// Present in the destination only.
    OnlyInDestination,
    /// Both are files with different content.
    Modified,
    /// One side is a file and the other a directory.
    KindMismatch,
}

/// One differing path, with its location on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    /// What kind of difference this is.
    pub change: Change,
    /// Path on the source side (may not exist).
    pub source: PathBuf,
    /// Path on the destination side (may not exist).
    pub destination: PathBuf,
}

/// Every difference between two trees, in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeDiff {
    /// The differing paths. Children of a one-sided directory are folded
    /// into the directory's own entry.
    pub entries: Vec<DiffEntry>,
}

impl TreeDiff {
    /// `true` when the two sides are identical.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compare `source` with `dest`.
///
/// A missing destination is always a difference. Directories are compared
/// by the union of their relative paths; empty directories present on both
/// sides are equal.
///
/// # Errors
///
/// Returns [`GroupError::Io`] if either tree cannot be walked or a file
/// cannot be read.
pub fn compare(source: &Path, dest: &Path) -> Result<TreeDiff, GroupError> {
    let entry = |change| DiffEntry {
        change,
        source: source.to_path_buf(),
        destination: dest.to_path_buf(),
    };

    let mut diff = TreeDiff::default();
    match (EntryKind::of(source), EntryKind::of(dest)) {
        (_, None) => diff.entries.push(entry(Change::OnlyInSource)),
        (None, Some(_)) => diff.entries.push(entry(Change::OnlyInDestination)),
        (Some(a), Some(b)) if a != b => diff.entries.push(entry(Change::KindMismatch)),
        (Some(EntryKind::File), Some(_)) => {
            if !same_content(source, dest)? {
                diff.entries.push(entry(Change::Modified));
            }
        }
        (Some(EntryKind::Directory), Some(_)) => compare_trees(source, dest, &mut diff)?,
    }
    Ok(diff)
}

/// `true` if `source` and `dest` differ in any way.
///
/// With a reporter every difference is logged, not just the first.
///
/// # Errors
///
/// See [`compare`].
pub fn differs(source: &Path, dest: &Path, report: Option<&dyn Log>) -> Result<bool, GroupError> {
    let diff = compare(source, dest)?;
    if let Some(log) = report {
        for entry in &diff.entries {
            log.info(&render(entry)?);
        }
    }
    Ok(!diff.is_empty())
}

/// Render a single difference for humans.
///
/// # Errors
///
/// Returns [`GroupError::Io`] if a modified file cannot be read.
pub fn render(entry: &DiffEntry) -> Result<String, GroupError> {
    let (src, dst) = (entry.source.display(), entry.destination.display());
    Ok(match entry.change {
        Change::OnlyInSource => format!("Only in source: {src}"),
        Change::OnlyInDestination => format!("Only in destination: {dst}"),
        Change::KindMismatch => format!("File type differs: {src} and {dst}"),
        Change::Modified => {
            let old = read(&entry.source)?;
            let new = read(&entry.destination)?;
            unified_diff(&old, &new, &src.to_string(), &dst.to_string())
                .unwrap_or_else(|| format!("Binary files {src} and {dst} differ"))
        }
    })
}

/// A unified diff of two byte buffers, or `None` if either is not UTF-8
/// text.
#[must_use]
pub fn unified_diff(old: &[u8], new: &[u8], old_label: &str, new_label: &str) -> Option<String> {
    let old = std::str::from_utf8(old).ok()?;
    let new = std::str::from_utf8(new).ok()?;
    Some(
        TextDiff::from_lines(old, new)
            .unified_diff()
            .context_radius(3)
            .header(old_label, new_label)
            .to_string(),
    )
}

fn compare_trees(source: &Path, dest: &Path, diff: &mut TreeDiff) -> Result<(), GroupError> {
    let left = list_tree(source)?;
    let right = list_tree(dest)?;

    let mut all: Vec<&PathBuf> = left.keys().chain(right.keys()).collect();
    all.sort();
    all.dedup();

    let mut folded: Vec<&PathBuf> = Vec::new();
    for rel in all {
        if folded.iter().any(|p| rel.starts_with(p)) {
            continue;
        }
        let change = match (left.get(rel), right.get(rel)) {
            (Some(_), None) => Some(Change::OnlyInSource),
            (None, Some(_)) => Some(Change::OnlyInDestination),
            (Some(a), Some(b)) if a != b => Some(Change::KindMismatch),
            (Some(EntryKind::File), Some(_)) => {
                (!same_content(&source.join(rel), &dest.join(rel))?).then_some(Change::Modified)
            }
            _ => None,
        };
        if let Some(change) = change {
            if change != Change::Modified {
                folded.push(rel);
            }
            diff.entries.push(DiffEntry {
                change,
                source: source.join(rel),
                destination: dest.join(rel),
            });
        }
    }
    Ok(())
}

fn list_tree(root: &Path) -> Result<BTreeMap<PathBuf, EntryKind>, GroupError> {
    let mut out = BTreeMap::new();
    for entry in walkdir::WalkDir::new(root).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            GroupError::io(path, std::io::Error::other(e))
        })?;
        if let Ok(rel) = entry.path().strip_prefix(root) {
            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            out.insert(rel.to_path_buf(), kind);
        }
    }
    Ok(out)
}

fn same_content(a: &Path, b: &Path) -> Result<bool, GroupError> {
    let (ma, mb) = (
        fs::metadata(a).map_err(|e| GroupError::io(a, e))?,
        fs::metadata(b).map_err(|e| GroupError::io(b, e))?,
    );
    if ma.len() != mb.len() {
        return Ok(false);
    }
    Ok(read(a)? == read(b)?)
}

fn read(path: &Path) -> Result<Vec<u8>, GroupError> {
    fs::read(path).map_err(|e| GroupError::io(path, e))
}
