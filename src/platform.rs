//! Host name detection used for group host filtering.
use std::fmt;

use crate::exec::Executor;

/// Environment variable that overrides host detection.
pub const HOST_ENV: &str = "CONFIT_HOST";

/// The host the current invocation runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    /// Host name compared against each group's `hosts`.
    pub name: String,
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Host {
    /// Create a host with an explicit name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Detect the current host.
    ///
    /// Tries `$CONFIT_HOST`, then `$HOSTNAME`, then the output of the
    /// `hostname` command. Falls back to `"localhost"`.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Self {
        Self::detect_from(
            |key| std::env::var(key).ok(),
            || {
                executor
                    .run("hostname", &[])
                    .ok()
                    .map(|r| r.stdout)
            },
        )
    }

    fn detect_from(
        env: impl Fn(&str) -> Option<String>,
        command: impl FnOnce() -> Option<String>,
    ) -> Self {
        let name = env(HOST_ENV)
            .and_then(non_empty)
            .or_else(|| env("HOSTNAME").and_then(non_empty))
            .or_else(|| command().and_then(non_empty))
            .unwrap_or_else(|| "localhost".to_string());
        Self { name }
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
