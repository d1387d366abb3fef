//! Leveled log sinks

use busgen_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Receives formatted log lines.
///
/// Implementations must be cheap to call from any thread; the layer calls
/// them synchronously while the event is being recorded.
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, target: &str, message: &str);
}

/// Global sink manager
static SINK_MANAGER: OnceCell<Arc<LogSinkManager>> = OnceCell::new();

/// Holds the active sink and the minimum level forwarded to it
pub struct LogSinkManager {
    sink: RwLock<Option<Arc<dyn LogSink>>>,
    level: AtomicU8,
}

impl LogSinkManager {
    /// Create a manager with no sink and level `Info`
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            level: AtomicU8::new(LogLevel::Info as u8),
        }
    }

    /// Get the global manager instance
    pub fn global() -> Arc<LogSinkManager> {
        SINK_MANAGER
            .get_or_init(|| Arc::new(LogSinkManager::new()))
            .clone()
    }

    /// Replace the sink; `None` discards every event
    pub fn set_sink(&self, sink: Option<Arc<dyn LogSink>>) {
        *self.sink.write() = sink;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.read().is_some()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::SeqCst);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::SeqCst))
    }

    /// Check if a log level is enabled
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level >= self.level()
    }

    /// Forward to the sink if one is set and `level` is enabled
    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if !self.is_enabled(level) {
            return;
        }
        let sink = self.sink.read().clone();
        if let Some(sink) = sink {
            sink.log(level, target, message);
        }
    }
}

impl Default for LogSinkManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes `LEVEL target: message` lines to standard error
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl LogSink for StderrSink {
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        let mut stderr = std::io::stderr().lock();
        // Nowhere left to report a failed write to stderr.
        let _ = writeln!(stderr, "{level} {target}: {message}");
    }
}

/// One record captured by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub target: String,
    pub message: String,
}

/// Keeps every record in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Records at exactly `level`
    pub fn at_level(&self, level: LogLevel) -> Vec<LogRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: LogLevel, target: &str, message: &str) {
        self.records.lock().push(LogRecord {
            level,
            target: target.to_string(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "sink/sink_tests.rs"]
mod sink_tests;
