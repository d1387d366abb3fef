//! Shutdown flag shared between the pool and its queued jobs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handle for triggering shutdown
#[derive(Clone, Debug, Default)]
pub struct ShutdownHandle {
    triggered: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Create a new shutdown handle
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger shutdown
    ///
    /// Returns `true` only for the first call.
    pub fn trigger(&self) -> bool {
        !self.triggered.swap(true, Ordering::SeqCst)
    }

    /// Check if shutdown has been triggered
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Get a signal that observes this handle
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            triggered: self.triggered.clone(),
        }
    }
}

/// Read-only view of a [`ShutdownHandle`], handed to every queued job
#[derive(Clone, Debug)]
pub struct ShutdownSignal {
    triggered: Arc<AtomicBool>,
}

impl ShutdownSignal {
    /// Check if shutdown has been triggered (non-blocking)
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}
