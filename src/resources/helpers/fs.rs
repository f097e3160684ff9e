//! File-system helpers shared by the copy, backup and diff resources.
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use filetime::FileTime;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Copy a single file byte for byte and carry over its modification time.
///
/// A symlink at `to` is replaced, never written through. A symlink at
/// `from` is recreated as a symlink on Unix and copied as its target
/// elsewhere.
///
/// # Errors
///
/// Returns an error if the file cannot be read, written, or re-timestamped.
pub fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    if to.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink()) {
        fs::remove_file(to)?;
    }
    let meta = from.symlink_metadata()?;
    if meta.file_type().is_symlink() {
        return copy_symlink(from, to, &meta);
    }
    fs::copy(from, to)?;
    filetime::set_file_mtime(to, FileTime::from_last_modification_time(&meta))
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path, meta: &fs::Metadata) -> io::Result<()> {
    if to.symlink_metadata().is_ok() {
        fs::remove_file(to)?;
    }
    std::os::unix::fs::symlink(fs::read_link(from)?, to)?;
    filetime::set_symlink_file_times(
        to,
        FileTime::from_last_access_time(meta),
        FileTime::from_last_modification_time(meta),
    )
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path, _meta: &fs::Metadata) -> io::Result<()> {
    fs::copy(from, to)?;
    let meta = fs::metadata(from)?;
    filetime::set_file_mtime(to, FileTime::from_last_modification_time(&meta))
}

/// Recursively copy the *contents* of `from` into `to`.
///
/// Every directory in the source tree is re-created, including empty ones,
/// and ends up with its source's modification time. Symlinks inside the
/// tree are recreated as symlinks, not followed. Files already present in
/// `to` but absent from `from` are left alone.
///
/// # Errors
///
/// Returns the first error encountered together with the path it occurred on.
pub fn copy_tree(from: &Path, to: &Path) -> Result<(), (PathBuf, io::Error)> {
    fs::create_dir_all(to).map_err(|e| (to.to_path_buf(), e))?;
    let mut dirs = vec![(from.to_path_buf(), to.to_path_buf())];
    for entry in walkdir::WalkDir::new(from).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            (path, io::Error::other(e))
        })?;
        let Ok(rel) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| (target.clone(), e))?;
            dirs.push((entry.path().to_path_buf(), target));
        } else {
            copy_file(entry.path(), &target).map_err(|e| (entry.path().to_path_buf(), e))?;
        }
    }

    // Writing into a directory bumps its mtime, so children go first.
    for (src, dst) in dirs.iter().rev() {
        let meta = fs::metadata(src).map_err(|e| (src.clone(), e))?;
        filetime::set_file_mtime(dst, FileTime::from_last_modification_time(&meta))
            .map_err(|e| (dst.clone(), e))?;
    }
    Ok(())
}

/// Remove whatever is at `path`: a directory tree, a file, or a symlink.
///
/// # Errors
///
/// Returns an error if `path` cannot be inspected or removed.
pub fn remove_path(path: &Path) -> io::Result<()> {
    if path.symlink_metadata()?.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// Lexically normalise `path`: drop `.` components and fold `..` into the
/// preceding component.  The filesystem is never consulted.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
