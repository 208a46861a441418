//! Message routing — the configuration-lookup seam.

use std::sync::Arc;

use vigil_types::FraudWindow;

use crate::submodule::Submodule;
use crate::watchers::WatcherSet;

/// Resolves which submodule, watcher set, and fraud window govern a message.
///
/// Who decides the mapping (and how it is administered) is outside the
/// engine. Implementations are immutable once the engine is constructed.
pub trait MessageRouting: Send + Sync {
    /// The submodule responsible for `message`, if any is configured.
    fn submodule_for(&self, message: &[u8]) -> Option<Arc<dyn Submodule>>;

    /// The watcher set guarding messages routed like `message`.
    fn watchers_for(&self, message: &[u8]) -> WatcherSet;

    /// The fraud window applied to messages routed like `message`.
    fn fraud_window_for(&self, message: &[u8]) -> FraudWindow;

    /// The currently configured watcher set.
    ///
    /// Fraud marking carries no message, so membership is checked against
    /// this set rather than a per-message one.
    fn watcher_set(&self) -> WatcherSet;
}

/// Production routing: one submodule, one watcher set, one window, fixed at
/// construction.
pub struct StaticRouting {
    submodule: Arc<dyn Submodule>,
    watchers: WatcherSet,
    window: FraudWindow,
}

impl StaticRouting {
    pub fn new(submodule: Arc<dyn Submodule>, watchers: WatcherSet, window: FraudWindow) -> Self {
        Self {
            submodule,
            watchers,
            window,
        }
    }
}

impl MessageRouting for StaticRouting {
    fn submodule_for(&self, _message: &[u8]) -> Option<Arc<dyn Submodule>> {
        Some(Arc::clone(&self.submodule))
    }

    fn watchers_for(&self, _message: &[u8]) -> WatcherSet {
        self.watchers.clone()
    }

    fn fraud_window_for(&self, _message: &[u8]) -> FraudWindow {
        self.window
    }

    fn watcher_set(&self) -> WatcherSet {
        self.watchers.clone()
    }
}
