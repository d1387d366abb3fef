//! Tracing layer that forwards events to a [`LogSink`](crate::LogSink)

use crate::reload::ReloadHandle;
use crate::sink::{LogSink, LogSinkManager};
use busgen_core::LogLevel;
use std::fmt::Write;
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Tracing layer that formats events as `message key=value ...` and hands
/// them to the manager's sink
pub struct SinkLayer {
    manager: Arc<LogSinkManager>,
}

impl SinkLayer {
    /// Create a layer using the global sink manager
    pub fn new() -> Self {
        Self::with_manager(LogSinkManager::global())
    }

    /// Create a layer with a specific sink manager
    pub fn with_manager(manager: Arc<LogSinkManager>) -> Self {
        Self { manager }
    }

    fn convert_level(level: &Level) -> LogLevel {
        match *level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            Level::ERROR => LogLevel::Error,
        }
    }
}

impl Default for SinkLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for SinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Self::convert_level(metadata.level());
        if !self.manager.is_enabled(level) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        self.manager
            .log(level, metadata.target(), &visitor.finish());
    }

    fn enabled(&self, metadata: &tracing::Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.manager
            .is_enabled(Self::convert_level(metadata.level()))
    }
}

/// Collects the `message` field plus every other field as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields.trim_start().to_string()
        } else {
            format!("{}{}", self.message, self.fields)
        }
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}

/// Install the global subscriber, forwarding to `sink` at `level` and above.
///
/// Returns `false` if a global subscriber was already installed; the sink and
/// level are updated either way.
pub fn init_logging_with_sink(sink: Arc<dyn LogSink>, level: LogLevel) -> bool {
    use tracing_subscriber::prelude::*;

    let manager = LogSinkManager::global();
    manager.set_sink(Some(sink));
    manager.set_level(level);

    let (filter, handle) = tracing_subscriber::reload::Layer::new(level_filter(level));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(SinkLayer::with_manager(manager));

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }
    ReloadHandle::global().set_handle(handle);
    true
}

/// Install the global subscriber, logging to standard error
pub fn init_logging(level: LogLevel) -> bool {
    init_logging_with_sink(Arc::new(crate::StderrSink), level)
}

/// Change the level of the global subscriber at runtime
pub fn set_log_level(level: LogLevel) {
    LogSinkManager::global().set_level(level);
    if let Err(e) = ReloadHandle::global().reload(level_filter(level)) {
        tracing::debug!("Level filter not reloaded: {}", e);
    }
}
