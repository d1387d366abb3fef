//! Reloadable level filter of the global subscriber

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::reload;

type FilterHandle = reload::Handle<LevelFilter, tracing_subscriber::Registry>;

/// Handle for swapping the level filter after initialization
pub struct ReloadHandle {
    handle: Mutex<Option<FilterHandle>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self {
            handle: Mutex::new(None),
        }
    }

    /// Get the global reload handle
    pub fn global() -> &'static ReloadHandle {
        static INSTANCE: OnceCell<ReloadHandle> = OnceCell::new();
        INSTANCE.get_or_init(ReloadHandle::new)
    }

    pub(crate) fn set_handle(&self, handle: FilterHandle) {
        *self.handle.lock() = Some(handle);
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.lock().is_some()
    }

    /// Replace the level filter
    pub fn reload(&self, filter: LevelFilter) -> Result<(), String> {
        let guard = self.handle.lock();
        let handle = guard
            .as_ref()
            .ok_or_else(|| "reload handle not initialized".to_string())?;
        handle
            .reload(filter)
            .map_err(|e| format!("failed to reload filter: {e}"))
    }
}

impl Default for ReloadHandle {
    fn default() -> Self {
        Self::new()
    }
}
