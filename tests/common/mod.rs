// Shared helpers for integration tests.
//
// Provides a temporary directory holding a repository and a fake home
// directory, plus a fluent builder so each test can describe its files and
// `confit.toml` without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use confit::commands::CommandSetup;
use confit::config::{CONFIG_FILE_NAME, Config};
use confit::exec::SystemExecutor;
use confit::logging::Logger;
use confit::platform::Host;
use confit::resources::copy::NativeCopy;

/// An isolated repository and home directory backed by a
/// [`tempfile::TempDir`].
///
/// Layout:
/// - `repo/`            mapping sources and `confit.toml`
/// - `home/`            destination root, reachable as `~` in the config
pub struct IntegrationTestContext {
    /// Temporary directory containing `repo/` and `home/`.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a context with empty `repo/` and `home/` directories.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(root.path().join("repo")).expect("create repo dir");
        std::fs::create_dir(root.path().join("home")).expect("create home dir");
        Self { root }
    }

    /// Repository root.
    pub fn repo(&self) -> PathBuf {
        self.root.path().join("repo")
    }

    /// Fake home directory.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Path of the config file inside the repository.
    pub fn config_path(&self) -> PathBuf {
        self.repo().join(CONFIG_FILE_NAME)
    }

    /// Load the config, expanding `~` to [`home`](Self::home).
    pub fn load_config(&self) -> Config {
        Config::load(&self.config_path(), Some(&self.home())).expect("load config")
    }

    /// Build a command setup for `host` that copies natively and runs real
    /// shell commands.
    pub fn setup(&self, host: &str) -> CommandSetup {
        CommandSetup::new(
            self.load_config(),
            Host::new(host),
            Arc::new(Logger::new("integration-test")),
            Arc::new(SystemExecutor),
        )
        .with_copier(Arc::new(NativeCopy))
    }

    /// Read a file relative to the repository.
    pub fn read_repo(&self, rel: &str) -> String {
        std::fs::read_to_string(self.repo().join(rel)).expect("read repo file")
    }

    /// Read a file relative to the home directory.
    pub fn read_home(&self, rel: &str) -> String {
        std::fs::read_to_string(self.home().join(rel)).expect("read home file")
    }

    /// Write a file relative to the home directory, creating parents.
    pub fn write_home(&self, rel: &str, content: &str) {
        write_file(&self.home().join(rel), content);
    }
}

/// Fluent builder for [`IntegrationTestContext`].
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `rel` inside the repository.
    #[must_use]
    pub fn with_repo_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.ctx.repo().join(rel), content);
        self
    }

    /// Write `content` to `rel` inside the home directory.
    #[must_use]
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        self.ctx.write_home(rel, content);
        self
    }

    /// Write the repository's `confit.toml`.
    #[must_use]
    pub fn with_config(self, toml: &str) -> Self {
        std::fs::write(self.ctx.config_path(), toml).expect("write confit.toml");
        self
    }

    /// Finalise the builder and return the context.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    std::fs::write(path, content).expect("write file");
}
