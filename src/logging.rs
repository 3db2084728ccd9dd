//! Console logging for plugin binaries.
//!
//! Events on the `plugin::command` target announce the program being
//! launched; `plugin::dry_run` marks launches that were skipped. Warnings,
//! errors and dry-run notes go to stderr, everything else to stdout, so a
//! dry run's stdout carries only the rendered invocation.
use std::fmt;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an [`EnvFilter`] directive that replaces the
/// default level, e.g. `DRONE_HELM_LOG=drone_plugin_helper=debug`.
pub const FILTER_ENV: &str = "DRONE_HELM_LOG";

/// Target for the command about to be launched.
pub const COMMAND_TARGET: &str = "plugin::command";

/// Target for a launch skipped because of a dry run.
pub const DRY_RUN_TARGET: &str = "plugin::dry_run";

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
struct MessageExtractor {
    message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Render one console line, without the trailing newline.
fn render(level: Level, target: &str, msg: &str) -> String {
    match level {
        Level::ERROR => format!("\x1b[31mERROR\x1b[0m {msg}"),
        Level::WARN => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        Level::INFO if target == COMMAND_TARGET => {
            format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
        }
        Level::INFO if target == DRY_RUN_TARGET => format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}"),
        Level::INFO => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// Whether an event belongs on stderr rather than stdout.
fn routes_to_stderr(level: Level, target: &str) -> bool {
    level <= Level::WARN || target == DRY_RUN_TARGET
}

/// A [`tracing_subscriber::fmt::FormatEvent`] for plugin console output.
struct PluginFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for PluginFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        writeln!(
            writer,
            "{}",
            render(*metadata.level(), metadata.target(), &extractor.message)
        )
    }
}

/// Build the event filter: [`FILTER_ENV`] when set and valid, otherwise
/// `debug` with `verbose` and `info` without.
fn filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Initialise the global [`tracing`] subscriber.
///
/// Must be called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let make_writer = std::io::stderr
        .with_filter(|meta: &tracing::Metadata<'_>| {
            routes_to_stderr(*meta.level(), meta.target())
        })
        .or_else(std::io::stdout);

    let console_layer = fmt::layer()
        .event_format(PluginFormatter)
        .with_writer(make_writer)
        .with_filter(filter(verbose));

    tracing_subscriber::registry().with(console_layer).init();
}
