//! Registration observers.
//!
//! # Invariants
//! - A notification is delivered to the subscribers present when it starts,
//!   in subscription order.
//! - Unsubscribed handlers never receive later notifications.

use crate::model::descriptor::ModDescriptor;
use std::sync::Arc;

/// Handle returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Ordered observer list for one event.
pub struct Observers<T> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<T>)>,
}

impl<T> Observers<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Removes a handler. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    /// Delivers `value` to a snapshot of the current subscribers.
    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Handler<T>> = self
            .handlers
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in snapshot {
            handler(value);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Events produced by the mod manager.
#[derive(Default)]
pub struct RegistrationEvents {
    /// Fired once per registered mod, after composition.
    pub on_new_mod: Observers<Arc<ModDescriptor>>,
    /// Fired when the host signals the end of loading.
    pub on_all_mods_loaded: Observers<()>,
}
