//! Subscriber types for the store.
//!
//! A Subscriber is any observer that wants to hear about committed
//! mutations: a render loop, a persistence hook, a test probe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::mutations::Mutation;

/// Unique identifier for a subscriber.
///
/// Returned from [`Store::subscribe`](super::Store::subscribe) and used to
/// unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// A callback notified after each committed mutation.
///
/// Cloning shares the callback, so the store can call a snapshot of its
/// subscribers without holding its lock.
#[derive(Clone)]
pub struct Subscriber {
    id: SubscriberId,
    notify: Arc<dyn Fn(&Mutation) + Send + Sync>,
}

impl Subscriber {
    pub fn new<F>(notify: F) -> Self
    where
        F: Fn(&Mutation) + Send + Sync + 'static,
    {
        Self {
            id: SubscriberId::new(),
            notify: Arc::new(notify),
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Tell the subscriber that `mutation` was applied.
    pub fn notify(&self, mutation: &Mutation) {
        (self.notify)(mutation);
    }
}

impl std::fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}
