//! Sinks receiving generated sources.
//!
//! A sink hands out at most one [`WriteHandle`] per class name. A `None` from
//! [`ArtifactSink::try_create`] means the class was already generated in this
//! build and the caller should skip it.

use crate::cache::write_atomic;
use crate::{CacheError, CacheResult, SOURCE_EXTENSION};
use busgen_core::{ClassName, GeneratedArtifact, GeneratorConfig};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Permission to write one generated class.
#[derive(Debug, PartialEq, Eq)]
pub struct WriteHandle {
    class_name: ClassName,
    path: PathBuf,
}

impl WriteHandle {
    pub fn new(class_name: ClassName, path: impl Into<PathBuf>) -> Self {
        Self {
            class_name,
            path: path.into(),
        }
    }

    pub fn class_name(&self) -> &ClassName {
        &self.class_name
    }

    /// Where the source will be written
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Destination for generated sources.
pub trait ArtifactSink: Send + Sync {
    /// Reserve `class_name`. Returns `None` if it was already reserved.
    fn try_create(&self, class_name: &ClassName) -> Option<WriteHandle>;

    /// Write `source` for a reserved class. A failed commit releases the
    /// reservation.
    fn commit(&self, handle: WriteHandle, source: &str) -> CacheResult<PathBuf>;

    /// Whether `class_name` has been reserved through this sink.
    fn is_created(&self, class_name: &ClassName) -> bool;

    /// Whether generating `class_name` would produce anything.
    fn should_generate(&self, class_name: &ClassName) -> bool {
        !self.is_created(class_name)
    }
}

#[derive(Debug, Default)]
struct Reservations {
    created: HashSet<ClassName>,
    committed: HashSet<ClassName>,
}

impl Reservations {
    fn reserve(&mut self, class_name: &ClassName) -> bool {
        self.created.insert(class_name.clone())
    }

    fn mark_committed(&mut self, class_name: &ClassName) -> CacheResult<()> {
        if !self.committed.insert(class_name.clone()) {
            return Err(CacheError::AlreadyCommitted(class_name.qualified()));
        }
        Ok(())
    }

    /// Forget a class whose commit failed so it can be generated again
    fn release(&mut self, class_name: &ClassName) {
        self.created.remove(class_name);
        self.committed.remove(class_name);
    }
}

/// Writes sources to `<out>/<package path>/<Simple>.java`.
#[derive(Debug)]
pub struct FsArtifactSink {
    out_dir: PathBuf,
    reservations: Mutex<Reservations>,
}

impl FsArtifactSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            reservations: Mutex::new(Reservations::default()),
        }
    }

    /// Create a sink writing to the configured output directory.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.output_dir)
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Path the source of `class_name` is written to.
    pub fn path_for(&self, class_name: &ClassName) -> PathBuf {
        let mut path = self.out_dir.clone();
        for segment in class_name.package().split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}{SOURCE_EXTENSION}", class_name.simple_name()));
        path
    }
}

impl ArtifactSink for FsArtifactSink {
    fn try_create(&self, class_name: &ClassName) -> Option<WriteHandle> {
        if !self.reservations.lock().reserve(class_name) {
            tracing::debug!(class = %class_name, "Already created, skipping");
            return None;
        }
        Some(WriteHandle::new(class_name.clone(), self.path_for(class_name)))
    }

    fn commit(&self, handle: WriteHandle, source: &str) -> CacheResult<PathBuf> {
        self.reservations.lock().mark_committed(&handle.class_name)?;

        let written = handle
            .path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .map_err(CacheError::from)
            .and_then(|()| write_atomic(&handle.path, source.as_bytes()));
        if let Err(err) = written {
            self.reservations.lock().release(&handle.class_name);
            return Err(err);
        }

        tracing::info!(class = %handle.class_name, path = %handle.path.display(), "Generated source written");
        Ok(handle.path)
    }

    fn is_created(&self, class_name: &ClassName) -> bool {
        self.reservations.lock().created.contains(class_name)
    }
}

/// Keeps committed sources in memory, keyed by fully-qualified class name.
#[derive(Debug, Default)]
pub struct MemoryArtifactSink {
    reservations: Mutex<Reservations>,
    sources: Mutex<BTreeMap<String, String>>,
}

impl MemoryArtifactSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source committed for `qualified`, if any
    pub fn source(&self, qualified: &str) -> Option<String> {
        self.sources.lock().get(qualified).cloned()
    }

    /// Every committed artifact, ordered by class name
    pub fn artifacts(&self) -> Vec<GeneratedArtifact> {
        self.sources
            .lock()
            .iter()
            .map(|(name, source)| GeneratedArtifact::new(ClassName::parse(name), source.clone()))
            .collect()
    }
}

impl ArtifactSink for MemoryArtifactSink {
    fn try_create(&self, class_name: &ClassName) -> Option<WriteHandle> {
        if !self.reservations.lock().reserve(class_name) {
            return None;
        }
        Some(WriteHandle::new(
            class_name.clone(),
            format!("{}{SOURCE_EXTENSION}", class_name.qualified()),
        ))
    }

    fn commit(&self, handle: WriteHandle, source: &str) -> CacheResult<PathBuf> {
        self.reservations.lock().mark_committed(&handle.class_name)?;
        self.sources
            .lock()
            .insert(handle.class_name.qualified(), source.to_string());
        Ok(handle.path)
    }

    fn is_created(&self, class_name: &ClassName) -> bool {
        self.reservations.lock().created.contains(class_name)
    }
}
