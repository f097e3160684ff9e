//! `tracing` wiring: a console formatter and a file layer that share one
//! classification of events.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata};

use super::utils::{HEADER_TIME, LINE_TIME, log_file_path, now, strip_ansi};

/// Target marking stage headers.
pub(super) const STAGE_TARGET: &str = "confit::stage";

/// What an event is, as far as rendering is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Stage,
    Error,
    Warn,
    Info,
    Debug,
}

impl Line {
    fn of(meta: &Metadata<'_>) -> Self {
        match *meta.level() {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO if meta.target() == STAGE_TARGET => Self::Stage,
            Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Plain-text marker used in the log file.
    const fn tag(self) -> &'static str {
        match self {
            Self::Stage => "==>",
            Self::Error => "[error]",
            Self::Warn => "[warn]",
            Self::Info => "",
            Self::Debug => "[debug]",
        }
    }
}

/// Pulls the formatted `message` field out of an event.
fn message(event: &Event<'_>) -> String {
    struct Message(String);

    impl Visit for Message {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }

        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                self.0 = value.to_string();
            }
        }
    }

    let mut visitor = Message(String::new());
    event.record(&mut visitor);
    visitor.0
}

/// Appends every event it sees to a log file, timestamped and without
/// ANSI codes.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate `path`, write a run header for `command`, and keep the file
    /// open for appending.
    ///
    /// Returns `None` if the file cannot be written.
    pub(super) fn open(path: &Path, command: &str) -> Option<Self> {
        let version =
            option_env!("CONFIT_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let header = format!("# confit {version} {command} {}\n", now(HEADER_TIME));
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let line = Line::of(event.metadata());
        let msg = strip_ansi(&message(event));
        let ts = now(LINE_TIME);
        let text = match line {
            Line::Info => format!("{ts}   {msg}"),
            other => format!("{ts} {} {msg}", other.tag()),
        };
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{text}").ok();
        }
    }
}

/// Console rendering: bold stage headers, indented output, dimmed debug
/// lines, colored warnings and errors.
struct ConsoleFormat;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormat
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let msg = message(event);
        match Line::of(event.metadata()) {
            Line::Stage => writeln!(writer, "\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Line::Error => writeln!(writer, "\x1b[31merror:\x1b[0m {msg}"),
            Line::Warn => writeln!(writer, "\x1b[33mwarning:\x1b[0m {msg}"),
            Line::Info => writeln!(writer, "  {msg}"),
            Line::Debug => writeln!(writer, "  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// Install the global subscriber for one `confit` run.
///
/// Warnings and errors go to stderr, everything else to stdout; debug lines
/// reach the console only with `verbose`. Every event, debug included, is
/// also written to the log file for `command` when one can be created.
///
/// Call once, before anything is logged.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .and(std::io::stdout.with_min_level(Level::INFO)),
        )
        .with_filter(if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        });

    let file = log_file_path(command)
        .and_then(|path| FileLayer::open(&path, command))
        .map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry().with(console).with(file).init();
}
