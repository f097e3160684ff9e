//! Interchangeable strategies for copying a file or a directory tree.
//!
//! A strategy is chosen once per process by [`detect`] and shared through
//! the [`Context`](crate::context::Context); call sites never branch on
//! which one is in use.
use std::path::{MAIN_SEPARATOR, Path};
use std::sync::Arc;

use super::EntryKind;
use super::helpers::fs::{copy_file, copy_tree, ensure_parent_dir};
use crate::error::GroupError;
use crate::exec::Executor;

/// Copies `from` onto `to`.
///
/// Implementations create missing parent directories of `to`, merge into an
/// existing directory without deleting extraneous entries, and leave a
/// partially written destination behind on failure.
#[cfg_attr(test, mockall::automock)]
pub trait CopyStrategy: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Copy `from` onto `to`. For a directory the *contents* of `from`
    /// land in `to`.
    ///
    /// # Errors
    ///
    /// Returns [`GroupError::Copy`] naming the path that failed.
    fn copy(&self, from: &Path, to: &Path, kind: EntryKind) -> Result<(), GroupError>;
}

/// Copies with `rsync -a`.
#[derive(Debug)]
pub struct RsyncCopy {
    executor: Arc<dyn Executor>,
}

impl RsyncCopy {
    /// Create an rsync strategy that runs through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }
}

impl CopyStrategy for RsyncCopy {
    fn name(&self) -> &'static str {
        "rsync"
    }

    fn copy(&self, from: &Path, to: &Path, kind: EntryKind) -> Result<(), GroupError> {
        ensure_parent_dir(to).map_err(|e| copy_error(to, e))?;
        let (src, dst) = match kind {
            EntryKind::File => (
                from.to_string_lossy().into_owned(),
                to.to_string_lossy().into_owned(),
            ),
            EntryKind::Directory => (with_trailing_separator(from), with_trailing_separator(to)),
        };
        self.executor
            .run("rsync", &["-a", &src, &dst])
            .map_err(|e| copy_error(from, e))?;
        Ok(())
    }
}

/// Portable recursive copy in pure Rust.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeCopy;

impl CopyStrategy for NativeCopy {
    fn name(&self) -> &'static str {
        "native"
    }

    fn copy(&self, from: &Path, to: &Path, kind: EntryKind) -> Result<(), GroupError> {
        ensure_parent_dir(to).map_err(|e| copy_error(to, e))?;
        match kind {
            EntryKind::File => copy_file(from, to).map_err(|e| copy_error(from, e)),
            EntryKind::Directory => copy_tree(from, to).map_err(|(path, e)| copy_error(&path, e)),
        }
    }
}

/// Pick [`RsyncCopy`] when `rsync` resolves on `PATH`, else [`NativeCopy`].
#[must_use]
pub fn detect(executor: &Arc<dyn Executor>) -> Arc<dyn CopyStrategy> {
    if executor.which("rsync").is_some() {
        Arc::new(RsyncCopy::new(Arc::clone(executor)))
    } else {
        Arc::new(NativeCopy)
    }
}

fn copy_error(path: &Path, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> GroupError {
    GroupError::Copy {
        path: path.to_path_buf(),
        source: source.into(),
    }
}

fn with_trailing_separator(path: &Path) -> String {
    let mut s = path.to_string_lossy().into_owned();
    if !s.ends_with(MAIN_SEPARATOR) {
        s.push(MAIN_SEPARATOR);
    }
    s
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::exec::SystemExecutor;
    use crate::resources::diff;
    use crate::resources::test_helpers::MockExecutor;
    use filetime::FileTime;
    use std::fs;

    #[test]
    fn rsync_copies_file_path_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let exec = Arc::new(MockExecutor::new());
        let rsync = RsyncCopy::new(exec.clone());
        let to = dir.path().join("nested/out.txt");

        rsync
            .copy(Path::new("/repo/in.txt"), &to, EntryKind::File)
            .unwrap();

        assert_eq!(
            exec.calls(),
            vec![format!("rsync -a /repo/in.txt {}", to.display())]
        );
        assert!(dir.path().join("nested").is_dir(), "parent must be created");
    }

    #[test]
    fn rsync_appends_separator_for_directories() {
        let dir = tempfile::tempdir().unwrap();
        let exec = Arc::new(MockExecutor::new());
        let rsync = RsyncCopy::new(exec.clone());
        let to = dir.path().join("b");

        rsync
            .copy(Path::new("/repo/a"), &to, EntryKind::Directory)
            .unwrap();

        assert_eq!(
            exec.calls(),
            vec![format!("rsync -a /repo/a/ {}/", to.display())]
        );
    }

    #[test]
    fn rsync_failure_is_copy_error() {
        let dir = tempfile::tempdir().unwrap();
        let exec = Arc::new(MockExecutor::with_responses(vec![(
            23,
            "partial transfer".to_string(),
        )]));
        let rsync = RsyncCopy::new(exec);

        let err = rsync
            .copy(Path::new("/repo/a"), &dir.path().join("a"), EntryKind::File)
            .unwrap_err();

        assert!(matches!(err, GroupError::Copy { ref path, .. } if path == Path::new("/repo/a")));
        assert!(err.to_string().contains("partial transfer"));
    }

    #[test]
    fn native_copies_directory_contents_not_directory_itself() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        fs::create_dir_all(a.join("empty")).unwrap();
        fs::write(a.join("f"), "x").unwrap();
        let b = dir.path().join("deep/b");

        NativeCopy.copy(&a, &b, EntryKind::Directory).unwrap();

        assert_eq!(fs::read_to_string(b.join("f")).unwrap(), "x");
        assert!(b.join("empty").is_dir());
        assert!(!b.join("a").exists());
    }

    #[test]
    fn native_copies_single_file_into_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("src.txt");
        fs::write(&from, "hello").unwrap();
        let to = dir.path().join("x/y/dst.txt");

        NativeCopy.copy(&from, &to, EntryKind::File).unwrap();

        assert_eq!(fs::read_to_string(&to).unwrap(), "hello");
    }

    #[test]
    fn native_failure_names_source() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("missing");
        let err = NativeCopy
            .copy(&from, &dir.path().join("out"), EntryKind::File)
            .unwrap_err();
        assert!(matches!(err, GroupError::Copy { ref path, .. } if *path == from));
    }

    #[cfg(unix)]
    #[test]
    fn rsync_and_native_produce_the_same_tree() {
        let exec: Arc<dyn Executor> = Arc::new(SystemExecutor);
        if exec.which("rsync").is_none() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("empty")).unwrap();
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("sub/f"), "content").unwrap();
        std::os::unix::fs::symlink("sub/f", src.join("link")).unwrap();
        let pinned = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(src.join("sub"), pinned).unwrap();
        let via_rsync = dir.path().join("rsync");
        let via_native = dir.path().join("native");

        RsyncCopy::new(Arc::clone(&exec))
            .copy(&src, &via_rsync, EntryKind::Directory)
            .unwrap();
        NativeCopy
            .copy(&src, &via_native, EntryKind::Directory)
            .unwrap();

        assert!(diff::compare(&via_rsync, &via_native).unwrap().is_empty());
        for root in [&via_rsync, &via_native] {
            assert!(root.join("empty").is_dir());
            let link = root.join("link");
            assert!(link.symlink_metadata().unwrap().file_type().is_symlink());
            assert_eq!(fs::read_link(&link).unwrap(), Path::new("sub/f"));
            let sub = fs::metadata(root.join("sub")).unwrap();
            assert_eq!(FileTime::from_last_modification_time(&sub), pinned);
        }
    }

    #[test]
    fn detect_prefers_rsync_when_available() {
        let with: Arc<dyn Executor> = Arc::new(MockExecutor::new().with_program("rsync"));
        let without: Arc<dyn Executor> = Arc::new(MockExecutor::new());
        assert_eq!(detect(&with).name(), "rsync");
        assert_eq!(detect(&without).name(), "native");
    }

    #[test]
    fn mock_strategy_sees_each_call() {
        let mut mock = MockCopyStrategy::new();
        mock.expect_copy()
            .withf(|from, to, kind| {
                from == Path::new("/s") && to == Path::new("/d") && *kind == EntryKind::File
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        mock.copy(Path::new("/s"), Path::new("/d"), EntryKind::File)
            .unwrap();
    }
}
