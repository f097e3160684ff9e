//! Log file location, ANSI stripping and timestamps.
use std::path::{Path, PathBuf};

/// `strftime` format of the run header in the log file.
pub(super) const HEADER_TIME: &str = "%Y-%m-%d %H:%M:%S";

/// `strftime` format prefixed to every log file line.
pub(super) const LINE_TIME: &str = "%H:%M:%S";

/// The current local time rendered with `format`.
pub(super) fn now(format: &str) -> String {
    chrono::Local::now().format(format).to_string()
}

/// Remove ANSI escape sequences.
///
/// CSI sequences (`ESC [ ... final`) are dropped up to and including the
/// final byte in `@`..=`~`; any other escape drops one following char.
pub(super) fn strip_ansi(s: &str) -> String {
    #[derive(Clone, Copy)]
    enum State {
        Text,
        Escape,
        Csi,
    }

    let mut state = State::Text;
    s.chars()
        .filter(|&c| match state {
            State::Text if c == '\x1b' => {
                state = State::Escape;
                false
            }
            State::Text => true,
            State::Escape => {
                state = if c == '[' { State::Csi } else { State::Text };
                false
            }
            State::Csi => {
                if ('@'..='~').contains(&c) {
                    state = State::Text;
                }
                false
            }
        })
        .collect()
}

/// `<cache>/confit/<command>.log`, creating the directory.
///
/// `<cache>` is `$XDG_CACHE_HOME`, else `~/.cache`. Returns `None` when
/// the directory cannot be created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| crate::config::home_dir().map(|home| home.join(".cache")))
        .unwrap_or_else(|| PathBuf::from(".cache"));
    log_file_in(&cache.join("confit"), command)
}

/// `<dir>/<command>.log`, creating `dir`.
pub(super) fn log_file_in(dir: &Path, command: &str) -> Option<PathBuf> {
    std::fs::create_dir_all(dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_colors() {
        assert_eq!(strip_ansi("\x1b[32m✓ vim\x1b[0m"), "✓ vim");
        assert_eq!(
            strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mInstalling\x1b[0m"),
            "==> Installing"
        );
    }

    #[test]
    fn strip_ansi_drops_other_sequences() {
        assert_eq!(strip_ansi("\x1b[2Kdone"), "done");
        assert_eq!(strip_ansi("\x1bMup"), "up");
        assert_eq!(strip_ansi("plain"), "plain");
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn timestamps_use_requested_format() {
        let line = now(LINE_TIME);
        assert_eq!(line.len(), 8);
        assert_eq!(line.matches(':').count(), 2);
        assert_eq!(now(HEADER_TIME).len(), 19);
    }

    #[test]
    fn log_file_in_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let path = log_file_in(&nested, "sync").unwrap();
        assert!(nested.is_dir());
        assert_eq!(path, nested.join("sync.log"));
    }
}
