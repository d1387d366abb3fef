//! Error types for the generator pipeline
//!
//! Each stage of the pipeline has its own error type. [`GenError`] is the
//! umbrella type handed back to callers. Every variant is `Clone` so a single
//! job failure can be delivered to every caller waiting on that job.

use crate::target::Strategy;
use thiserror::Error;

/// Result type alias for generator operations
pub type GenResult<T> = Result<T, GenError>;

/// A scan could not cover part of the type universe.
///
/// Scan errors are recoverable: the affected prefix or package is skipped and
/// the rest of the scan proceeds.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The package prefix is not a valid dotted Java package name
    #[error("malformed package prefix '{prefix}': {reason}")]
    MalformedPrefix { prefix: String, reason: String },

    /// The package (or prefix) exists but could not be read
    #[error("package '{package}' could not be read: {reason}")]
    UnreadablePackage { package: String, reason: String },
}

/// A candidate type could not be structurally modeled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The type is not present in the universe
    #[error("type {type_name} not found in the type universe")]
    UnknownType { type_name: String },

    /// The strategy needs an interface but the type is something else
    #[error("{type_name} is not an interface; {strategy} generation requires one")]
    NotAnInterface { type_name: String, strategy: Strategy },

    /// A type, method or parameter name is not a legal Java identifier
    #[error("{type_name}: '{identifier}' is not a valid {kind} name")]
    InvalidIdentifier {
        type_name: String,
        identifier: String,
        kind: &'static str,
    },

    /// A declared parameter or return type is not a well-formed type reference
    #[error("{type_name}.{method}: invalid type '{ty}': {reason}")]
    InvalidType {
        type_name: String,
        method: String,
        ty: String,
        reason: String,
    },

    /// Two parameters of the same method share a name
    #[error("{type_name}.{method}: duplicate parameter name '{parameter}'")]
    DuplicateParameter {
        type_name: String,
        method: String,
        parameter: String,
    },
}

/// Synthesized source would not be valid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// An identifier in the syntax tree is not legal Java
    #[error("'{identifier}' is not a valid Java identifier (generating for {type_name})")]
    InvalidIdentifier {
        type_name: String,
        identifier: String,
    },

    /// An observer method cannot be bridged to the bus
    #[error("invalid observer method {type_name}.{method}: {reason}")]
    InvalidObserver {
        type_name: String,
        method: String,
        reason: String,
    },

    /// No decorator is registered for the annotation
    #[error("no decorator registered for @{annotation} (on {type_name})")]
    UnknownDecorator {
        annotation: String,
        type_name: String,
    },
}

/// The scheduler could not run or finish a job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Too many jobs are queued on the worker pool
    #[error("worker pool exhausted: {pending} jobs pending (limit {limit})")]
    PoolExhausted { pending: usize, limit: usize },

    /// The scheduler was shut down before the job could run
    #[error("scheduler is shut down")]
    ShutDown,

    /// The job's worker stopped before producing a result
    #[error("job for {target} was interrupted: {reason}")]
    Interrupted { target: String, reason: String },

    /// The worker pool could not be created
    #[error("failed to start worker pool: {0}")]
    PoolStart(String),
}

/// Error type for the generator pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    /// Scanning the type universe failed
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// A type could not be modeled
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    /// Source synthesis failed for a strategy
    #[error("{strategy} synthesis failed: {source}")]
    Synthesis {
        strategy: Strategy,
        #[source]
        source: SynthesisError,
    },

    /// The job scheduler failed
    #[error("scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// The artifact cache failed
    #[error("cache error: {0}")]
    Cache(String),

    /// The artifact sink failed
    #[error("artifact sink error: {0}")]
    Sink(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl GenError {
    /// Wrap a synthesis error with the strategy that produced it
    pub fn synthesis(strategy: Strategy, source: SynthesisError) -> Self {
        GenError::Synthesis { strategy, source }
    }

    /// Process exit code for the command-line tool
    pub fn exit_code(&self) -> i32 {
        match self {
            GenError::Scan(_) => 2,
            GenError::Model(_) => 3,
            GenError::Synthesis { .. } => 4,
            GenError::Scheduler(_) => 5,
            GenError::Cache(_) => 6,
            GenError::Sink(_) => 7,
            GenError::Config(_) => 8,
        }
    }
}

impl From<serde_json::Error> for GenError {
    fn from(err: serde_json::Error) -> Self {
        GenError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for GenError {
    fn from(err: toml::de::Error) -> Self {
        GenError::Config(err.to_string())
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
