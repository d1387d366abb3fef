#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

// LogSinkManager tests

#[test]
fn LogSinkManager___new___default_level_is_info() {
    let manager = LogSinkManager::new();

    assert_eq!(manager.level(), LogLevel::Info);
}

#[test]
fn LogSinkManager___new___no_sink_set() {
    let manager = LogSinkManager::new();

    assert!(!manager.has_sink());
}

#[test]
fn LogSinkManager___set_level___changes_level() {
    let manager = LogSinkManager::new();

    manager.set_level(LogLevel::Debug);

    assert_eq!(manager.level(), LogLevel::Debug);
}

#[test_case(LogLevel::Trace, false)]
#[test_case(LogLevel::Debug, true)]
#[test_case(LogLevel::Info, true)]
#[test_case(LogLevel::Warn, true)]
#[test_case(LogLevel::Error, true)]
fn LogSinkManager___is_enabled_at_debug___respects_level_ordering(level: LogLevel, enabled: bool) {
    let manager = LogSinkManager::new();
    manager.set_level(LogLevel::Debug);

    assert_eq!(manager.is_enabled(level), enabled);
}

#[test]
fn LogSinkManager___level_off___disables_everything() {
    let manager = LogSinkManager::new();
    manager.set_level(LogLevel::Off);

    assert!(!manager.is_enabled(LogLevel::Error));
    assert!(!manager.is_enabled(LogLevel::Off));
}

#[test]
fn LogSinkManager___log___forwards_enabled_records() {
    let manager = LogSinkManager::new();
    let sink = Arc::new(MemorySink::new());
    manager.set_sink(Some(sink.clone()));
    manager.set_level(LogLevel::Warn);

    manager.log(LogLevel::Info, "busgen", "skipped");
    manager.log(LogLevel::Error, "busgen", "kept");

    assert_eq!(
        sink.records(),
        vec![LogRecord {
            level: LogLevel::Error,
            target: "busgen".to_string(),
            message: "kept".to_string(),
        }]
    );
}

#[test]
fn LogSinkManager___set_sink_none___stops_forwarding() {
    let manager = LogSinkManager::new();
    let sink = Arc::new(MemorySink::new());
    manager.set_sink(Some(sink.clone()));

    manager.set_sink(None);
    manager.log(LogLevel::Error, "busgen", "dropped");

    assert!(sink.records().is_empty());
    assert!(!manager.has_sink());
}

#[test]
fn LogSinkManager___global___returns_same_instance() {
    let a = LogSinkManager::global();
    let b = LogSinkManager::global();

    assert!(Arc::ptr_eq(&a, &b));
}

// MemorySink tests

#[test]
fn MemorySink___at_level___filters_records() {
    let sink = MemorySink::new();
    sink.log(LogLevel::Warn, "a", "one");
    sink.log(LogLevel::Error, "b", "two");
    sink.log(LogLevel::Warn, "c", "three");

    let warnings = sink.at_level(LogLevel::Warn);

    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[1].message, "three");
}

#[test]
fn MemorySink___clear___removes_records() {
    let sink = MemorySink::new();
    sink.log(LogLevel::Info, "a", "one");

    sink.clear();

    assert!(sink.records().is_empty());
}

#[test]
fn StderrSink___log___does_not_panic() {
    StderrSink.log(LogLevel::Info, "busgen", "hello");
}
