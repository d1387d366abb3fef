//! End-to-end generation over a type universe on disk
#![allow(non_snake_case)]

use busgen::codegen::simulate::{SimulatedMessage, run_callback};
use busgen::prelude::*;
use busgen::{FsArtifactSink, MemoryArtifactSink, TargetOutcome};
use busgen_core::{Annotation, RawMethod, RawParameter, RawType, TypeHandle, UniverseError};
use serde_json::json;
use parking_lot::{Condvar, Mutex};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tempfile::TempDir;

const REMOTE: &str = "org.busgen.api.Remote";
const OBSERVES: &str = "javax.enterprise.event.Observes";
const LOADER: &str = "org.busgen.client.framework.RpcProxyLoader";

fn write_type(root: &Path, ty: &RawType) {
    let package = ty.package().to_string();
    let dir = package.split('.').fold(root.to_path_buf(), |d, s| d.join(s));
    std::fs::create_dir_all(&dir).unwrap();
    let simple = ty.name.rsplit('.').next().unwrap();
    std::fs::write(
        dir.join(format!("{simple}.json")),
        serde_json::to_string_pretty(ty).unwrap(),
    )
    .unwrap();
}

fn foo() -> RawType {
    RawType::interface("com.example.Foo")
        .annotated(Annotation::marker(REMOTE))
        .with_method(
            RawMethod::new("bar")
                .returning("java.lang.String")
                .with_parameter(RawParameter::new("message", "java.lang.String")),
        )
}

fn listener() -> RawType {
    RawType::class("com.example.events.Listener").with_method(
        RawMethod::new("onEvent").with_parameter(
            RawParameter::new("event", "com.example.Event")
                .annotated(Annotation::marker(OBSERVES))
                .annotated(Annotation::qualifier("urgent")),
        ),
    )
}

struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let ws = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        write_type(&ws.universe_root(), &foo());
        write_type(&ws.universe_root(), &listener());
        ws
    }

    fn universe_root(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("universe")
    }

    fn config(&self) -> GeneratorConfig {
        GeneratorConfig::new()
            .with_package("com.example")
            .with_worker_threads(2)
            .with_cache_dir(self.temp_dir.path().join("cache"))
            .with_output_dir(self.temp_dir.path().join("out"))
    }

    fn engine(&self, sink: Arc<dyn ArtifactSink>) -> Arc<Engine> {
        let universe = Arc::new(DirectoryUniverse::new(self.universe_root()));
        Arc::new(Engine::new(self.config(), universe, sink).unwrap())
    }
}

#[test]
fn generate___loader_for_Foo___proxies_bar_over_the_bus() {
    let ws = Workspace::new();
    let sink = Arc::new(MemoryArtifactSink::new());
    let engine = ws.engine(sink.clone());

    let name = RpcProxyLoaderGenerator::new(engine).generate(LOADER).unwrap();

    let source = sink.source(&name).unwrap();
    assert!(source.contains("public java.lang.String bar(final java.lang.String a0) {"));
    assert!(source.contains(
        "org.busgen.client.MessageBuilder.createCall().call(\"com.example.Foo:RPC\")\
         .endpoint(\"bar:java.lang.String:\", qualifiers, new java.lang.Object[] { a0 })\
         .respondTo(java.lang.String.class, remoteCallback).errorsHandledBy(errorCallback)\
         .sendNowWith(bus);"
    ));
    assert!(source.contains("return null;"));
    assert!(source.contains("return new com_example_FooImpl();"));
}

#[test]
fn generate___observer___callback_honors_qualifiers() {
    let ws = Workspace::new();
    let engine = ws.engine(Arc::new(MemoryArtifactSink::new()));
    let config = engine.config().clone();

    // The generated class wraps the same decorated statement the simulator runs
    let ctx = busgen::codegen::SynthesisContext::from_config(&config);
    let registry = busgen::codegen::DecoratorRegistry::with_defaults(&ctx);
    let descriptor = busgen_core::ModelBuilder::new()
        .build(&listener(), Strategy::ObserverSubscription)
        .unwrap();
    let points = registry.injection_points(&descriptor);
    let stmt = registry.decorate(&points[0], &ctx).unwrap();
    let event = SimulatedMessage::new("com.example.Event", json!({"id": 1}));

    let matching = run_callback(&stmt, &event.clone().with_qualifiers(["urgent"])).unwrap();
    let other = run_callback(&stmt, &event.with_qualifiers(["routine"])).unwrap();

    assert_eq!(matching.len(), 1);
    assert!(other.is_empty());
    assert_eq!(
        ObserverGenerator::new(engine)
            .generate("com.example.events.Listener")
            .unwrap(),
        "com.example.events.Listener_ObserverSubscriptions"
    );
}

#[test]
fn generate___concurrent_requests___one_artifact_per_class() {
    let ws = Workspace::new();
    let sink = Arc::new(MemoryArtifactSink::new());
    let engine = ws.engine(sink.clone());

    let names: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = engine.clone();
                s.spawn(move || RpcProxyLoaderGenerator::new(engine).generate(LOADER).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(names.iter().all(|n| n == "org.busgen.client.framework.RpcProxyLoaderImpl"));
    assert_eq!(sink.artifacts().len(), 1);
}

#[test]
fn generate___filesystem_sink___writes_output_and_cache() {
    let ws = Workspace::new();
    let engine = ws.engine(Arc::new(FsArtifactSink::from_config(&ws.config())));

    RpcProxyLoaderGenerator::new(engine.clone()).generate(LOADER).unwrap();

    let out = ws
        .temp_dir
        .path()
        .join("out/org/busgen/client/framework/RpcProxyLoaderImpl.java");
    let written = std::fs::read_to_string(out).unwrap();
    let cached = engine
        .cache()
        .read(&GenerationTarget::rpc_proxy_loader(LOADER))
        .unwrap();
    assert_eq!(cached.source(), written);
}

#[test]
fn generate___second_engine_with_reuse___serves_cached_source() {
    let ws = Workspace::new();
    let first = ws.engine(Arc::new(MemoryArtifactSink::new()));
    RpcProxyLoaderGenerator::new(first.clone()).generate(LOADER).unwrap();
    first.shutdown();

    // The remote interface disappears; only the cache still knows the loader
    std::fs::remove_file(ws.universe_root().join("com/example/Foo.json")).unwrap();
    let mut config = ws.config();
    config.reuse_cached_artifacts = true;
    let sink = Arc::new(MemoryArtifactSink::new());
    let universe = Arc::new(DirectoryUniverse::new(ws.universe_root()));
    let second = Arc::new(Engine::new(config, universe, sink.clone()).unwrap());

    let name = RpcProxyLoaderGenerator::new(second).generate(LOADER).unwrap();

    assert!(sink.source(&name).unwrap().contains("com.example.Foo"));
}

#[test]
fn generate_all___unreadable_sub_package___partial_but_successful() {
    let ws = Workspace::new();
    let broken = ws.universe_root().join("com/example/broken");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("Bad.json"), "{ not json").unwrap();
    let sink = Arc::new(MemoryArtifactSink::new());
    let engine = ws.engine(sink.clone());

    let report = generate_all(&engine);

    assert!(report.is_success(), "failures: {:?}", report.first_error());
    assert_eq!(
        report.generated().collect::<Vec<_>>(),
        vec![
            "org.busgen.client.framework.RpcProxyLoaderImpl",
            "com.example.events.Listener_ObserverSubscriptions",
        ]
    );
    assert!(!report.scan_warnings.is_empty());
    assert!(report.scan_warnings.iter().any(|w| w.contains("com.example.broken")));
    assert_eq!(sink.artifacts().len(), 2);
}

#[test]
fn generate_all___invalid_observer___recorded_and_pass_continues() {
    let ws = Workspace::new();
    write_type(
        &ws.universe_root(),
        &RawType::class("com.example.events.Broken").with_method(
            RawMethod::new("onEvent")
                .with_parameter(
                    RawParameter::new("event", "com.example.Event")
                        .annotated(Annotation::marker(OBSERVES)),
                )
                .with_parameter(RawParameter::new("extra", "int")),
        ),
    );
    let engine = ws.engine(Arc::new(MemoryArtifactSink::new()));

    let report = generate_all(&engine);

    assert!(!report.is_success());
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.type_name(), "com.example.events.Broken");
    assert_eq!(failures[0].1.exit_code(), 4);
    assert!(report.outcomes.iter().any(|(_, o)| matches!(
        o,
        TargetOutcome::Generated { class_name } if class_name.ends_with("Listener_ObserverSubscriptions")
    )));
}

#[test]
fn generate_all___malformed_prefix_beside_usable___warned_and_generated() {
    let ws = Workspace::new();
    let config = ws.config().with_package("com..bad");
    let universe = Arc::new(DirectoryUniverse::new(ws.universe_root()));
    let engine = Arc::new(Engine::new(config, universe, Arc::new(MemoryArtifactSink::new())).unwrap());

    let report = generate_all(&engine);

    assert!(report.is_success(), "failures: {:?}", report.first_error());
    assert_eq!(report.generated().count(), 2);
    assert!(
        report
            .scan_warnings
            .iter()
            .any(|w| w.contains("malformed package prefix 'com..bad'")),
        "{:?}",
        report.scan_warnings
    );
}

#[test]
fn generate_all___only_malformed_prefixes___config_error() {
    let ws = Workspace::new();
    let config = GeneratorConfig::new().with_package("com..bad");
    let universe = Arc::new(DirectoryUniverse::new(ws.universe_root()));

    let result = Engine::new(config, universe, Arc::new(MemoryArtifactSink::new()));

    assert!(matches!(result, Err(GenError::Config(_))));
}

/// Universe whose lookups, once armed, hold until two of them overlap
struct RendezvousUniverse {
    inner: InMemoryUniverse,
    armed: AtomicBool,
    arrived: Mutex<usize>,
    all_arrived: Condvar,
    overlapped: AtomicBool,
}

impl RendezvousUniverse {
    fn new(types: Vec<RawType>) -> Self {
        Self {
            inner: InMemoryUniverse::from_types(types),
            armed: AtomicBool::new(false),
            arrived: Mutex::new(0),
            all_arrived: Condvar::new(),
            overlapped: AtomicBool::new(false),
        }
    }
}

impl TypeUniverse for RendezvousUniverse {
    fn list_packages(&self, prefix: &str) -> Result<Vec<String>, UniverseError> {
        self.inner.list_packages(prefix)
    }

    fn types_in(&self, package: &str) -> Result<Vec<TypeHandle>, UniverseError> {
        if self.armed.load(Ordering::SeqCst) {
            let mut arrived = self.arrived.lock();
            *arrived += 1;
            if *arrived >= 2 {
                self.overlapped.store(true, Ordering::SeqCst);
                self.all_arrived.notify_all();
            } else {
                self.all_arrived
                    .wait_for(&mut arrived, Duration::from_secs(5));
            }
        }
        self.inner.types_in(package)
    }
}

#[test]
fn generate_all___observers___generated_concurrently() {
    let temp_dir = TempDir::new().unwrap();
    let second = RawType::class("com.example.events.Auditor").with_method(
        RawMethod::new("onEvent").with_parameter(
            RawParameter::new("event", "com.example.Event").annotated(Annotation::marker(OBSERVES)),
        ),
    );
    let universe = Arc::new(RendezvousUniverse::new(vec![foo(), listener(), second]));
    let config = GeneratorConfig::new()
        .with_package("com.example")
        .with_worker_threads(2)
        .with_cache_dir(temp_dir.path().join("cache"));
    let engine = Arc::new(
        Engine::new(config, universe.clone(), Arc::new(MemoryArtifactSink::new())).unwrap(),
    );
    // Warm the package cache so only observer synthesis reaches the universe
    engine.scan(OBSERVES);
    engine.scan(REMOTE);
    universe.armed.store(true, Ordering::SeqCst);

    let report = generate_all(&engine);

    assert!(report.is_success(), "failures: {:?}", report.first_error());
    assert_eq!(report.generated().count(), 3);
    assert!(universe.overlapped.load(Ordering::SeqCst));
}
