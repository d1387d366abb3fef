//! Error types for cache and sink operations.

use busgen_core::GenError;
use thiserror::Error;

/// Errors that can occur during cache and sink operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata sidecar could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// No entry is cached for the target.
    #[error("Not cached: {0}")]
    NotCached(String),

    /// Cached source does not match its recorded checksum.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// Entry or artifact names a different class than the target generates.
    #[error("Class mismatch for {target}: expected {expected}, found {actual}")]
    ClassMismatch {
        target: String,
        expected: String,
        actual: String,
    },

    /// The sink already committed this class.
    #[error("Already committed: {0}")]
    AlreadyCommitted(String),
}

impl CacheError {
    /// Whether the error only means "nothing usable is cached"
    pub fn is_miss(&self) -> bool {
        !matches!(self, CacheError::AlreadyCommitted(_))
    }
}

impl From<CacheError> for GenError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::AlreadyCommitted(_) => GenError::Sink(err.to_string()),
            other => GenError::Cache(other.to_string()),
        }
    }
}
