//! State shared by every job of one scheduler

use once_cell::sync::OnceCell;

/// Shared generation context.
///
/// Holds the one-shot setup guard: the first job that asks for setup runs it,
/// every later request is a no-op even when issued from many threads at once.
#[derive(Debug, Default)]
pub struct SharedContext {
    initialized: OnceCell<()>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `setup` unless some caller already has.
    ///
    /// Concurrent callers block until the winning setup returns. Returns
    /// `true` for the caller whose closure ran.
    pub fn run_once<F>(&self, setup: F) -> bool
    where
        F: FnOnce(),
    {
        let mut ran = false;
        self.initialized.get_or_init(|| {
            setup();
            ran = true;
        });
        if ran {
            tracing::debug!("Shared context initialized");
        }
        ran
    }

    /// Whether setup has completed
    pub fn is_initialized(&self) -> bool {
        self.initialized.get().is_some()
    }
}
