//! Generator configuration
//!
//! Loaded from `busgen.toml` (or JSON). Every field has a default so an empty
//! file is a valid configuration.
//!
//! ```toml
//! packages = ["com.example.client"]
//! worker_threads = 4
//! cache_dir = ".busgen/cache"
//!
//! [annotations]
//! remote = "org.busgen.api.Remote"
//! ```

use crate::error::{GenError, GenResult};
use crate::ident::{is_qualified_name, package_prefix_problem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Annotation names driving the scan and dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationNames {
    /// Marks interfaces that get an RPC proxy
    #[serde(default = "default_remote")]
    pub remote: String,

    /// Marks observer method parameters
    #[serde(default = "default_observes")]
    pub observes: String,

    /// On an observer method, restricts the subscription to the local bus
    #[serde(default = "default_local")]
    pub local: String,

    /// Annotations always treated as qualifiers
    #[serde(default)]
    pub qualifiers: Vec<String>,
}

fn default_remote() -> String {
    "org.busgen.api.Remote".to_string()
}

fn default_observes() -> String {
    "javax.enterprise.event.Observes".to_string()
}

fn default_local() -> String {
    "org.busgen.api.Local".to_string()
}

impl Default for AnnotationNames {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            observes: default_observes(),
            local: default_local(),
            qualifiers: Vec::new(),
        }
    }
}

/// Names of the runtime bus API the generated code calls into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusApi {
    pub message_bus: String,
    pub message: String,
    pub message_callback: String,
    pub message_builder: String,
    pub remote_callback: String,
    pub error_callback: String,
    pub rpc_stub: String,
    pub proxy_provider: String,
    pub remote_proxy_factory: String,
    /// Class holding the `QUALIFIERS` and `OBJECT_REF` envelope keys
    pub protocol: String,
    /// Prefix of event subjects; the event type name is appended
    pub subject_prefix: String,
}

impl Default for BusApi {
    fn default() -> Self {
        Self {
            message_bus: "org.busgen.client.MessageBus".to_string(),
            message: "org.busgen.client.Message".to_string(),
            message_callback: "org.busgen.client.MessageCallback".to_string(),
            message_builder: "org.busgen.client.MessageBuilder".to_string(),
            remote_callback: "org.busgen.client.RemoteCallback".to_string(),
            error_callback: "org.busgen.client.ErrorCallback".to_string(),
            rpc_stub: "org.busgen.client.framework.RpcStub".to_string(),
            proxy_provider: "org.busgen.client.framework.ProxyProvider".to_string(),
            remote_proxy_factory: "org.busgen.client.framework.RemoteServiceProxyFactory"
                .to_string(),
            protocol: "org.busgen.client.cdi.CDIProtocol".to_string(),
            subject_prefix: "cdi.event:".to_string(),
        }
    }
}

impl BusApi {
    fn class_names(&self) -> [(&'static str, &str); 10] {
        [
            ("message_bus", &self.message_bus),
            ("message", &self.message),
            ("message_callback", &self.message_callback),
            ("message_builder", &self.message_builder),
            ("remote_callback", &self.remote_callback),
            ("error_callback", &self.error_callback),
            ("rpc_stub", &self.rpc_stub),
            ("proxy_provider", &self.proxy_provider),
            ("remote_proxy_factory", &self.remote_proxy_factory),
            ("protocol", &self.protocol),
        ]
    }
}

/// Configuration for a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Package prefixes to scan
    #[serde(default)]
    pub packages: Vec<String>,

    #[serde(default)]
    pub annotations: AnnotationNames,

    #[serde(default)]
    pub bus: BusApi,

    /// Interface the generated proxy loader implements
    #[serde(default = "default_loader_contract")]
    pub loader_contract: String,

    /// Directory mirroring generated sources between builds
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Directory receiving generated sources
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Size of the generation worker pool
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Maximum number of jobs queued or running at once
    #[serde(default = "default_max_pending_jobs")]
    pub max_pending_jobs: usize,

    /// Serve cached artifacts instead of regenerating them
    #[serde(default)]
    pub reuse_cached_artifacts: bool,

    /// Initial log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_loader_contract() -> String {
    "org.busgen.client.framework.RpcProxyLoader".to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".busgen/cache")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("target/generated-sources/busgen")
}

fn default_worker_threads() -> usize {
    4
}

fn default_max_pending_jobs() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            annotations: AnnotationNames::default(),
            bus: BusApi::default(),
            loader_contract: default_loader_contract(),
            cache_dir: default_cache_dir(),
            output_dir: default_output_dir(),
            worker_threads: default_worker_threads(),
            max_pending_jobs: default_max_pending_jobs(),
            reuse_cached_artifacts: false,
            log_level: default_log_level(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from JSON bytes
    pub fn from_json(bytes: &[u8]) -> GenResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Create configuration from TOML text
    pub fn from_toml_str(content: &str) -> GenResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file; `.json` files are read as JSON,
    /// everything else as TOML
    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| GenError::Config(format!("failed to read {path:?}: {e}")))?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json(content.as_bytes())
        } else {
            Self::from_toml_str(&content)
        }
    }

    /// Add a package prefix to scan
    pub fn with_package(mut self, prefix: impl Into<String>) -> Self {
        self.packages.push(prefix.into());
        self
    }

    /// Set the worker pool size
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Set the cache directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Check the configuration for values that cannot work
    pub fn validate(&self) -> GenResult<()> {
        if self.packages.is_empty() {
            return Err(GenError::Config(
                "at least one package prefix is required".to_string(),
            ));
        }
        // Malformed prefixes are skipped by the scanner, which reports them.
        let mut usable = 0;
        for prefix in &self.packages {
            match package_prefix_problem(prefix) {
                Some(problem) => {
                    tracing::warn!(%prefix, "Ignoring malformed package prefix: {}", problem)
                }
                None => usable += 1,
            }
        }
        if usable == 0 {
            return Err(GenError::Config(format!(
                "no usable package prefix in {:?}",
                self.packages
            )));
        }

        if self.worker_threads == 0 {
            return Err(GenError::Config("worker_threads must be at least 1".to_string()));
        }
        if self.max_pending_jobs == 0 {
            return Err(GenError::Config(
                "max_pending_jobs must be at least 1".to_string(),
            ));
        }

        let annotations = [
            ("annotations.remote", &self.annotations.remote),
            ("annotations.observes", &self.annotations.observes),
            ("annotations.local", &self.annotations.local),
            ("loader_contract", &self.loader_contract),
        ];
        for (field, name) in annotations {
            if !is_qualified_name(name) {
                return Err(GenError::Config(format!(
                    "{field} is not a qualified name: '{name}'"
                )));
            }
        }
        for (field, name) in self.bus.class_names() {
            if !is_qualified_name(name) {
                return Err(GenError::Config(format!(
                    "bus.{field} is not a qualified name: '{name}'"
                )));
            }
        }

        self.log_level.parse::<crate::LogLevel>()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
