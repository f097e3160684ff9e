//! Shared state handed to every group operation.
use std::path::PathBuf;
use std::sync::Arc;

use crate::exec::Executor;
use crate::logging::Log;
use crate::resources::copy::{self, CopyStrategy};

/// Collaborators resolved once per invocation.
pub struct Context {
    /// Repository root that mapping sources are resolved against.
    pub repo: PathBuf,
    /// Copy strategy selected at startup.
    pub copier: Arc<dyn CopyStrategy>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Logger for output and group recording.
    pub log: Arc<dyn Log>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("repo", &self.repo)
            .field("copier", &self.copier.name())
            .field("executor", &self.executor)
            .field("log", &"<dyn Log>")
            .finish()
    }
}

impl Context {
    /// Create a context, detecting the copy strategy through `executor`.
    #[must_use]
    pub fn new(repo: impl Into<PathBuf>, log: Arc<dyn Log>, executor: Arc<dyn Executor>) -> Self {
        let copier = copy::detect(&executor);
        Self {
            repo: repo.into(),
            copier,
            executor,
            log,
        }
    }

    /// Replace the copy strategy.
    #[must_use]
    pub fn with_copier(self, copier: Arc<dyn CopyStrategy>) -> Self {
        Self { copier, ..self }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::logging::test_helpers::RecordingLog;
    use crate::resources::copy::NativeCopy;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn new_detects_strategy_from_executor() {
        let exec: Arc<dyn Executor> = Arc::new(MockExecutor::new().with_program("rsync"));
        let ctx = Context::new("/repo", Arc::new(RecordingLog::new()), exec);
        assert_eq!(ctx.copier.name(), "rsync");
    }

    #[test]
    fn with_copier_overrides_detection() {
        let exec: Arc<dyn Executor> = Arc::new(MockExecutor::new().with_program("rsync"));
        let ctx = Context::new("/repo", Arc::new(RecordingLog::new()), exec)
            .with_copier(Arc::new(NativeCopy));
        assert_eq!(ctx.copier.name(), "native");
    }

    #[test]
    fn debug_shows_strategy_name() {
        let ctx = Context::new(
            "/repo",
            Arc::new(RecordingLog::new()),
            Arc::new(MockExecutor::new()),
        );
        let dbg = format!("{ctx:?}");
        assert!(dbg.contains("\"native\""));
        assert!(dbg.contains("/repo"));
    }
}
