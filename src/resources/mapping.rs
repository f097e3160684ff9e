//! Resolution of declared `(source, destination)` pairs to absolute paths.
use std::path::{Path, PathBuf};

use super::EntryKind;
use super::helpers::fs::normalize;
use crate::error::GroupError;

/// A declared `(source, destination)` pair.
///
/// The source is joined onto the repository root and the destination onto
/// the group's `dest`; an absolute path on either side stays as it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    /// Source path, relative to the repository root.
    pub source: PathBuf,
    /// Destination path, relative to the group destination root.
    pub destination: PathBuf,
}

/// A mapping with both sides turned into absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapping {
    /// Absolute path inside the repository.
    pub source: PathBuf,
    /// Absolute path under the group destination root.
    pub destination: PathBuf,
}

impl Mapping {
    /// Create a mapping from two path-like values.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Join both sides onto their roots without touching the filesystem.
    ///
    /// Used by operations that must cope with a missing source or
    /// destination (backup, diff, sync).
    #[must_use]
    pub fn locate(&self, src_root: &Path, dest: &Path) -> ResolvedMapping {
        ResolvedMapping {
            source: normalize(&src_root.join(&self.source)),
            destination: normalize(&dest.join(&self.destination)),
        }
    }

    /// Resolve the mapping for an install and classify it.
    ///
    /// The kind comes from the source as it exists on disk right now.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::InvalidMapping`] if the two sides overlap, the
    /// source does not exist, or the destination exists with the other kind.
    pub fn resolve(
        &self,
        src_root: &Path,
        dest: &Path,
    ) -> Result<(ResolvedMapping, EntryKind), GroupError> {
        let resolved = self.locate(src_root, dest);
        resolved.check_disjoint()?;
        let kind = compatible_kind(&resolved.source, &resolved.destination)?;
        Ok((resolved, kind))
    }
}

impl ResolvedMapping {
    /// Reject mappings whose destination equals, contains, or lies inside
    /// the source.
    ///
    /// Paths are compared as written and, when both sides exist, again
    /// after resolving symlinks, so `~/.vimrc -> repo/vimrc` overlaps with
    /// `repo/vimrc`.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::InvalidMapping`] naming the destination.
    pub fn check_disjoint(&self) -> Result<(), GroupError> {
        let canonical = dunce::canonicalize(&self.source)
            .and_then(|s| dunce::canonicalize(&self.destination).map(|d| (s, d)));
        if overlaps(&self.source, &self.destination)
            || canonical.is_ok_and(|(s, d)| overlaps(&s, &d))
        {
            return Err(GroupError::InvalidMapping {
                path: self.destination.clone(),
                reason: format!("overlaps with source {}", self.source.display()),
            });
        }
        Ok(())
    }
}

fn overlaps(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Classify `from` and make sure copying it onto `to` keeps the same kind.
///
/// `to` may be missing; `from` must exist.
///
/// # Errors
///
/// Returns [`GroupError::InvalidMapping`] if `from` is missing or if `to`
/// exists as a file where `from` is a directory (or the reverse).
pub fn compatible_kind(from: &Path, to: &Path) -> Result<EntryKind, GroupError> {
    let Some(kind) = EntryKind::of(from) else {
        return Err(GroupError::InvalidMapping {
            path: from.to_path_buf(),
            reason: "path does not exist".to_string(),
        });
    };
    if let Some(existing) = EntryKind::of(to)
        && existing != kind
    {
        return Err(GroupError::InvalidMapping {
            path: to.to_path_buf(),
            reason: format!("cannot replace a {existing} with a {kind}"),
        });
    }
    Ok(kind)
}
