//! busgen-core - Data model, type universe and structural modeling
//!
//! This crate provides the foundational pieces of the generator pipeline:
//! - [`TypeUniverse`] trait plus [`InMemoryUniverse`] and [`DirectoryUniverse`]
//! - [`TypeScanner`] for finding annotated types in a set of packages
//! - [`ModelBuilder`] for turning raw types into immutable [`TypeDescriptor`]s
//! - [`GenerationTarget`] and [`GeneratedArtifact`], the units of generation
//! - [`JobState`] for tracking generation jobs
//! - [`GenError`] and friends for error handling
//! - [`GeneratorConfig`] for configuration

mod builder;
mod config;
mod error;
pub mod ident;
mod job_state;
mod model;
mod scanner;
mod target;
mod universe;

pub use builder::ModelBuilder;
pub use config::{AnnotationNames, BusApi, GeneratorConfig};
pub use error::{GenError, GenResult, ModelError, ScanError, SchedulerError, SynthesisError};
pub use job_state::JobState;
pub use model::{
    JavaType, MethodDescriptor, ParameterDescriptor, Qualifier, QualifierSet, TypeDescriptor,
    qualifiers_match,
};
pub use scanner::{ScanOutcome, TypeScanner};
pub use target::{ClassName, GeneratedArtifact, GenerationTarget, Strategy};
pub use universe::{
    Annotation, DirectoryUniverse, InMemoryUniverse, RawMethod, RawParameter, RawType, TypeHandle,
    TypeKind, TypeUniverse, UniverseError,
};

/// Log levels understood by the logging sink
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Off = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Trace,
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            3 => LogLevel::Warn,
            4 => LogLevel::Error,
            _ => LogLevel::Off,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            other => Err(GenError::Config(format!("unknown log level '{other}'"))),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        GenError, GenResult, GeneratedArtifact, GenerationTarget, GeneratorConfig, JobState,
        LogLevel, ModelBuilder, Strategy, TypeDescriptor, TypeScanner, TypeUniverse,
    };
}
