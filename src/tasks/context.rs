use std::sync::Arc;

use crate::assets::FileStore;
use crate::config::Settings;
use crate::exec::Executor;
use crate::logging::Log;

/// Shared context for task execution.
pub struct Context {
    /// Paths and environment lookups resolved once at startup.
    pub settings: Settings,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Template store (embedded or directory-backed).
    pub store: Arc<dyn FileStore>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("store", &self.store)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        settings: Settings,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        store: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            settings,
            log,
            executor,
            store,
        }
    }
}
