//! On-disk artifact cache.
//!
//! Every entry is two files in the cache directory, named after the generated
//! class:
//!
//! ```text
//! .busgen/cache/
//! ├── com.example.client.RpcProxyLoaderImpl.java
//! └── com.example.client.RpcProxyLoaderImpl.meta.json
//! ```
//!
//! The sidecar records the target, the class name and a checksum of the
//! source. The cache is advisory: a missing, unreadable or mismatched entry
//! is reported as a miss and never blocks generation.

use crate::checksum::{checksum_of, compute_sha256, verify_sha256};
use crate::{CACHE_FORMAT_VERSION, CacheError, CacheResult, META_EXTENSION, SOURCE_EXTENSION};
use busgen_core::{GeneratedArtifact, GenerationTarget, GeneratorConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Contents of a `.meta.json` sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryMeta {
    /// Cache layout version.
    pub format_version: String,

    /// Target the source was generated for.
    pub target: GenerationTarget,

    /// Fully-qualified name of the generated class.
    pub class_name: String,

    /// Checksum of the source file (`sha256:<hex>`).
    pub checksum: String,
}

/// Artifact cache rooted at a directory.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    dir: PathBuf,
}

impl ArtifactCache {
    /// Create a cache rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a cache in the configured cache directory.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.cache_dir)
    }

    /// Root directory of the cache.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cached source for `target`.
    pub fn source_path(&self, target: &GenerationTarget) -> PathBuf {
        self.entry_path(target, SOURCE_EXTENSION)
    }

    /// Path of the metadata sidecar for `target`.
    pub fn meta_path(&self, target: &GenerationTarget) -> PathBuf {
        self.entry_path(target, META_EXTENSION)
    }

    fn entry_path(&self, target: &GenerationTarget, extension: &str) -> PathBuf {
        self.dir
            .join(format!("{}{extension}", target.class_name().qualified()))
    }

    /// Whether a valid entry exists for `target`.
    pub fn has(&self, target: &GenerationTarget) -> bool {
        self.lookup(target).is_ok()
    }

    /// Whether `target` needs generating, i.e. nothing valid is cached.
    pub fn should_generate(&self, target: &GenerationTarget) -> bool {
        !self.has(target)
    }

    /// Store `artifact` for `target`, replacing any earlier entry.
    ///
    /// Returns the path of the cached source.
    pub fn write(
        &self,
        target: &GenerationTarget,
        artifact: &GeneratedArtifact,
    ) -> CacheResult<PathBuf> {
        let expected = target.class_name();
        if artifact.class_name() != &expected {
            return Err(CacheError::ClassMismatch {
                target: target.to_string(),
                expected: expected.qualified(),
                actual: artifact.class_name().qualified(),
            });
        }

        fs::create_dir_all(&self.dir)?;

        let meta = CacheEntryMeta {
            format_version: CACHE_FORMAT_VERSION.to_string(),
            target: target.clone(),
            class_name: expected.qualified(),
            checksum: checksum_of(artifact.source().as_bytes()),
        };

        // Source first: a crash between the two writes leaves a checksum
        // mismatch, which reads as a miss.
        let source_path = self.source_path(target);
        write_atomic(&source_path, artifact.source().as_bytes())?;
        write_atomic(&self.meta_path(target), &serde_json::to_vec_pretty(&meta)?)?;

        tracing::debug!(%target, path = %source_path.display(), "Artifact cached");
        Ok(source_path)
    }

    /// Read the entry for `target`, or `None` on a miss.
    ///
    /// Entries that exist but cannot be used are logged and treated as misses.
    pub fn read(&self, target: &GenerationTarget) -> Option<GeneratedArtifact> {
        match self.lookup(target) {
            Ok(artifact) => Some(artifact),
            Err(CacheError::NotCached(_)) => None,
            Err(err) => {
                tracing::warn!(%target, "Ignoring cache entry: {}", err);
                None
            }
        }
    }

    /// Read the entry for `target`, reporting why it cannot be used.
    pub fn lookup(&self, target: &GenerationTarget) -> CacheResult<GeneratedArtifact> {
        let meta_path = self.meta_path(target);
        let meta_bytes = read_entry_file(&meta_path, target)?;
        let meta: CacheEntryMeta = serde_json::from_slice(&meta_bytes)?;

        let expected = target.class_name();
        if &meta.target != target || meta.class_name != expected.qualified() {
            return Err(CacheError::ClassMismatch {
                target: target.to_string(),
                expected: expected.qualified(),
                actual: meta.class_name,
            });
        }

        let source_path = self.source_path(target);
        let source = read_entry_file(&source_path, target)?;
        if !verify_sha256(&source, &meta.checksum) {
            return Err(CacheError::ChecksumMismatch {
                path: source_path.display().to_string(),
                expected: meta.checksum,
                actual: format!("sha256:{}", compute_sha256(&source)),
            });
        }

        let source = String::from_utf8(source).map_err(|e| {
            CacheError::Io(std::io::Error::new(ErrorKind::InvalidData, e))
        })?;
        Ok(GeneratedArtifact::new(expected, source))
    }

    /// Remove the entry for `target`. Returns whether anything was removed.
    pub fn invalidate(&self, target: &GenerationTarget) -> CacheResult<bool> {
        let mut removed = false;
        for path in [self.source_path(target), self.meta_path(target)] {
            match fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        if removed {
            tracing::debug!(%target, "Cache entry invalidated");
        }
        Ok(removed)
    }
}

fn read_entry_file(path: &Path, target: &GenerationTarget) -> CacheResult<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CacheError::NotCached(target.to_string()),
        _ => CacheError::Io(e),
    })
}

/// Write through a temporary file in the same directory, then rename.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> CacheResult<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(
        ".{file_name}.{}.{}.tmp",
        std::process::id(),
        TMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    fs::write(&tmp, contents)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
