//! busgen-logging - Tracing to leveled sink bridge
//!
//! This crate provides:
//! - [`LogSink`], the leveled sink generated-code tooling logs to
//! - [`SinkLayer`], a tracing layer that forwards events to the active sink
//! - [`init_logging`] and [`set_log_level`] for the global subscriber

mod layer;
mod reload;
mod sink;

pub use busgen_core::LogLevel;
pub use layer::{SinkLayer, init_logging, init_logging_with_sink, set_log_level};
pub use reload::ReloadHandle;
pub use sink::{LogRecord, LogSink, LogSinkManager, MemorySink, StderrSink};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, LogSink, SinkLayer, init_logging};
}
