//! # busgen
//!
//! Annotation-driven Java source generation for a message bus.
//!
//! busgen scans a type universe for annotated types and generates:
//! - one proxy loader class registering a bus-backed RPC proxy for every
//!   remote interface
//! - one subscription class per observer bean, bridging each observed event
//!   type to a bus subject with qualifier filtering
//!
//! Generation runs on a bounded worker pool with at most one job per target,
//! writes through an [`ArtifactSink`] and mirrors the output into an
//! [`ArtifactCache`].
//!
//! ## Usage
//!
//! ```no_run
//! use busgen::prelude::*;
//! use std::sync::Arc;
//!
//! let config = GeneratorConfig::new().with_package("com.example.client");
//! let universe = Arc::new(DirectoryUniverse::new("build/types"));
//! let engine = Arc::new(Engine::with_output_dir(config, universe)?);
//!
//! let loader = RpcProxyLoaderGenerator::new(engine.clone());
//! let class_name = loader.generate("org.busgen.client.framework.RpcProxyLoader")?;
//! println!("generated {class_name}");
//! # Ok::<(), GenError>(())
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`busgen_core`] - Data model, type universe, scanner, model builder, config
//! - [`busgen_codegen`] - Java syntax tree, rendering, proxy and observer synthesis
//! - [`busgen_runtime`] - Worker pool and single-flight scheduler
//! - [`busgen_cache`] - Artifact cache and sinks
//! - [`busgen_logging`] - Tracing layer and log sinks

mod engine;
mod generator;
mod report;

pub use engine::Engine;
pub use generator::{Generator, ObserverGenerator, RpcProxyLoaderGenerator};
pub use report::{GenerationReport, TargetOutcome, generate_all};

// Re-export core types
pub use busgen_core::{
    ClassName, DirectoryUniverse, GenError, GenResult, GeneratedArtifact, GenerationTarget,
    GeneratorConfig, InMemoryUniverse, LogLevel, ScanOutcome, Strategy, TypeScanner, TypeUniverse,
};

pub use busgen_cache::{ArtifactCache, ArtifactSink, FsArtifactSink, MemoryArtifactSink};
pub use busgen_runtime::{JobHandle, Scheduler};

// Re-export member crates for lower-level access
pub use busgen_cache as cache;
pub use busgen_codegen as codegen;
pub use busgen_logging as logging;
pub use busgen_runtime as runtime;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        ArtifactSink, DirectoryUniverse, Engine, GenError, GenResult, GenerationTarget, Generator,
        GeneratorConfig, InMemoryUniverse, ObserverGenerator, RpcProxyLoaderGenerator, Strategy,
        TypeUniverse, generate_all,
    };
}
