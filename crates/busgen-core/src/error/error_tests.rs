#![allow(non_snake_case)]

use super::*;

#[test]
fn ModelError___not_an_interface___names_type_and_strategy() {
    let err = ModelError::NotAnInterface {
        type_name: "com.example.FooImpl".into(),
        strategy: Strategy::RpcProxy,
    };

    let display = err.to_string();

    assert_eq!(
        display,
        "com.example.FooImpl is not an interface; rpc-proxy generation requires one"
    );
}

#[test]
fn GenError___synthesis___names_strategy_and_type() {
    let err = GenError::synthesis(
        Strategy::ObserverSubscription,
        SynthesisError::InvalidObserver {
            type_name: "com.example.Listener".into(),
            method: "onEvent".into(),
            reason: "expected exactly one parameter".into(),
        },
    );

    let display = err.to_string();

    assert!(display.starts_with("observer-subscription synthesis failed"));
    assert!(display.contains("com.example.Listener.onEvent"));
}

#[test]
fn GenError___from_scan_error___converts() {
    let scan = ScanError::UnreadablePackage {
        package: "com.example.broken".into(),
        reason: "permission denied".into(),
    };

    let err: GenError = scan.clone().into();

    assert_eq!(err, GenError::Scan(scan));
}

#[test]
fn GenError___from_scheduler_error___converts() {
    let err: GenError = SchedulerError::ShutDown.into();

    assert!(matches!(err, GenError::Scheduler(SchedulerError::ShutDown)));
    assert_eq!(err.to_string(), "scheduler error: scheduler is shut down");
}

#[test]
fn GenError___from_json_error___becomes_config_error() {
    let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();

    let err: GenError = json_err.into();

    assert!(matches!(err, GenError::Config(_)));
}

#[test]
fn GenError___clone___preserves_source_chain() {
    let err = GenError::synthesis(
        Strategy::RpcProxy,
        SynthesisError::InvalidIdentifier {
            type_name: "com.example.Foo".into(),
            identifier: "class".into(),
        },
    );

    let copy = err.clone();

    assert_eq!(err, copy);
    assert!(std::error::Error::source(&copy).is_some());
}

#[test]
fn GenError___all_variants___have_unique_exit_codes() {
    let errors = vec![
        GenError::Scan(ScanError::MalformedPrefix {
            prefix: "".into(),
            reason: "".into(),
        }),
        GenError::Model(ModelError::DuplicateParameter {
            type_name: "".into(),
            method: "".into(),
            parameter: "".into(),
        }),
        GenError::synthesis(
            Strategy::RpcProxy,
            SynthesisError::UnknownDecorator {
                annotation: "".into(),
                type_name: "".into(),
            },
        ),
        GenError::Scheduler(SchedulerError::ShutDown),
        GenError::Cache("".into()),
        GenError::Sink("".into()),
        GenError::Config("".into()),
    ];

    let codes: Vec<i32> = errors.iter().map(|e| e.exit_code()).collect();
    let unique: std::collections::HashSet<i32> = codes.iter().copied().collect();

    assert_eq!(codes.len(), unique.len(), "exit codes must be unique");
    assert!(codes.iter().all(|c| *c > 1));
}

#[test]
fn ModelError___unknown_type___names_type() {
    let err = ModelError::UnknownType {
        type_name: "com.example.Missing".to_string(),
    };

    assert_eq!(
        err.to_string(),
        "type com.example.Missing not found in the type universe"
    );
}

#[test]
fn ModelError___invalid_type___names_method_and_reason() {
    let err = ModelError::InvalidType {
        type_name: "com.example.Sink".to_string(),
        method: "put".to_string(),
        ty: "java.util.List<String".to_string(),
        reason: "unclosed generic arguments".to_string(),
    };

    assert_eq!(
        err.to_string(),
        "com.example.Sink.put: invalid type 'java.util.List<String': unclosed generic arguments"
    );
}
