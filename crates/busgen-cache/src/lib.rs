//! Artifact cache and sinks for busgen
//!
//! This crate provides:
//! - [`ArtifactCache`], an advisory on-disk cache keyed by generation target
//! - [`ArtifactSink`] with [`FsArtifactSink`] and [`MemoryArtifactSink`],
//!   which receive generated sources at most once per class
//!
//! # Example
//!
//! ```no_run
//! use busgen_cache::ArtifactCache;
//! use busgen_core::{GeneratedArtifact, GenerationTarget};
//!
//! let cache = ArtifactCache::new(".busgen/cache");
//! let target = GenerationTarget::rpc_proxy_loader("com.example.RpcProxyLoader");
//!
//! if cache.should_generate(&target) {
//!     let artifact = GeneratedArtifact::new(target.class_name(), "package com.example;\n");
//!     cache.write(&target, &artifact)?;
//! }
//! # Ok::<(), busgen_cache::CacheError>(())
//! ```

mod cache;
mod checksum;
mod error;
mod sink;

pub use cache::{ArtifactCache, CacheEntryMeta};
pub use checksum::{checksum_of, compute_sha256, verify_sha256};
pub use error::CacheError;
pub use sink::{ArtifactSink, FsArtifactSink, MemoryArtifactSink, WriteHandle};

/// Result type for cache and sink operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Extension of generated and cached sources.
pub const SOURCE_EXTENSION: &str = ".java";

/// Extension of cache metadata sidecars.
pub const META_EXTENSION: &str = ".meta.json";

/// Current cache layout version.
pub const CACHE_FORMAT_VERSION: &str = "1";
