//! Logging infrastructure for structured console and file output.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{GroupEntry, GroupStatus, Log};

/// A [`Logger`] whose log file lives in a fresh temp directory, fed by a
/// thread-local subscriber carrying only the file layer.
///
/// Keep the returned guard alive for the whole test; dropping it restores
/// the previous dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let tmp = tempfile::tempdir().expect("temp dir");
    let path = utils::log_file_in(tmp.path(), "test").expect("log path");
    let layer = subscriber::FileLayer::open(&path, "test").expect("file layer");
    let dispatch = tracing::Dispatch::new(
        tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG)),
    );
    let guard = tracing::dispatcher::set_default(&dispatch);
    (Logger::with_log_file(Some(path)), tmp, guard)
}
