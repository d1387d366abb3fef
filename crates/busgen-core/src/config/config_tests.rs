#![allow(non_snake_case)]

use super::*;

fn valid() -> GeneratorConfig {
    GeneratorConfig::new().with_package("com.example")
}

#[test]
fn GeneratorConfig___default___has_expected_values() {
    let config = GeneratorConfig::default();

    assert_eq!(config.worker_threads, 4);
    assert_eq!(config.max_pending_jobs, 256);
    assert_eq!(config.cache_dir, PathBuf::from(".busgen/cache"));
    assert_eq!(config.annotations.observes, "javax.enterprise.event.Observes");
    assert_eq!(config.bus.subject_prefix, "cdi.event:");
    assert!(!config.reuse_cached_artifacts);
}

#[test]
fn GeneratorConfig___from_json___empty_returns_default() {
    let config = GeneratorConfig::from_json(b"").unwrap();

    assert_eq!(config.worker_threads, 4);
}

#[test]
fn GeneratorConfig___from_json___parses_packages() {
    let json = r#"{"packages": ["com.example", "org.other"]}"#;

    let config = GeneratorConfig::from_json(json.as_bytes()).unwrap();

    assert_eq!(config.packages, vec!["com.example", "org.other"]);
}

#[test]
fn GeneratorConfig___from_toml_str___parses_nested_tables() {
    let toml = r#"
        packages = ["com.example"]
        worker_threads = 2

        [annotations]
        remote = "com.example.api.Remote"

        [bus]
        subject_prefix = "events:"
    "#;

    let config = GeneratorConfig::from_toml_str(toml).unwrap();

    assert_eq!(config.worker_threads, 2);
    assert_eq!(config.annotations.remote, "com.example.api.Remote");
    assert_eq!(config.annotations.local, "org.busgen.api.Local");
    assert_eq!(config.bus.subject_prefix, "events:");
    assert_eq!(config.bus.message_bus, "org.busgen.client.MessageBus");
}

#[test]
fn GeneratorConfig___from_toml_str___invalid_is_config_error() {
    let err = GeneratorConfig::from_toml_str("packages = 7").unwrap_err();

    assert!(matches!(err, GenError::Config(_)));
}

#[test]
fn GeneratorConfig___from_file___reads_toml_and_json() {
    let dir = tempfile::TempDir::new().unwrap();
    let toml_path = dir.path().join("busgen.toml");
    let json_path = dir.path().join("busgen.json");
    std::fs::write(&toml_path, "packages = [\"a.b\"]").unwrap();
    std::fs::write(&json_path, r#"{"packages": ["c.d"]}"#).unwrap();

    assert_eq!(GeneratorConfig::from_file(&toml_path).unwrap().packages, vec!["a.b"]);
    assert_eq!(GeneratorConfig::from_file(&json_path).unwrap().packages, vec!["c.d"]);
}

#[test]
fn GeneratorConfig___from_file___missing_file_is_config_error() {
    let err = GeneratorConfig::from_file("/nonexistent/busgen.toml").unwrap_err();

    assert!(matches!(err, GenError::Config(_)));
}

#[test]
fn GeneratorConfig___builder_chain___combines_options() {
    let config = GeneratorConfig::new()
        .with_package("com.example")
        .with_worker_threads(8)
        .with_cache_dir("/tmp/cache")
        .with_output_dir("/tmp/out");

    assert_eq!(config.packages, vec!["com.example"]);
    assert_eq!(config.worker_threads, 8);
    assert_eq!(config.cache_dir, PathBuf::from("/tmp/cache"));
    assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
}

#[test]
fn GeneratorConfig___validate___accepts_valid_config() {
    assert!(valid().validate().is_ok());
}

#[test]
fn GeneratorConfig___validate___requires_packages() {
    let err = GeneratorConfig::new().validate().unwrap_err();

    assert!(err.to_string().contains("package prefix"));
}

#[test]
fn GeneratorConfig___validate___rejects_zero_workers() {
    let err = valid().with_worker_threads(0).validate().unwrap_err();

    assert!(err.to_string().contains("worker_threads"));
}

#[test]
fn GeneratorConfig___validate___rejects_bad_bus_class() {
    let mut config = valid();
    config.bus.message_bus = "not a class".to_string();

    let err = config.validate().unwrap_err();

    assert!(err.to_string().contains("bus.message_bus"));
}

#[test]
fn GeneratorConfig___validate___rejects_unknown_log_level() {
    let mut config = valid();
    config.log_level = "chatty".to_string();

    assert!(config.validate().is_err());
}
