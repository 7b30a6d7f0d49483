//! Process-scoped registry pinning the single dispatcher instance.

use std::sync::RwLock;

use ractor::ActorRef;

use crate::messages::DispatcherMessage;

/// Registry that keys the one dispatcher for the life of the process.
///
/// The concurrency cap is one actor's counter; a second dispatcher would
/// split the cap across two independent counters. Holding the instance
/// here lets re-initialization (module reloads, repeated startup paths)
/// find the existing dispatcher instead of constructing a duplicate.
pub struct DispatcherRegistry {
    dispatcher: RwLock<Option<ActorRef<DispatcherMessage>>>,
}

impl DispatcherRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            dispatcher: RwLock::new(None),
        }
    }

    /// Install the dispatcher.
    ///
    /// Returns `false` and keeps the existing instance when one is
    /// already installed.
    pub fn install(&self, dispatcher: ActorRef<DispatcherMessage>) -> bool {
        let mut slot = self.dispatcher.write().unwrap();
        if slot.is_some() {
            return false;
        }
        *slot = Some(dispatcher);
        true
    }

    /// Get the installed dispatcher.
    pub fn get(&self) -> Option<ActorRef<DispatcherMessage>> {
        self.dispatcher.read().unwrap().clone()
    }

    /// Remove the installed dispatcher.
    pub fn uninstall(&self) {
        *self.dispatcher.write().unwrap() = None;
    }
}

impl Default for DispatcherRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global registry instance.
static REGISTRY: std::sync::LazyLock<DispatcherRegistry> =
    std::sync::LazyLock::new(DispatcherRegistry::new);

/// Get the global dispatcher registry.
pub fn global_registry() -> &'static DispatcherRegistry {
    &REGISTRY
}
