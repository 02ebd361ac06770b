//! Store Implementation
//!
//! The Store is the single owner of the tapestry state. It holds the value
//! and the list of observers that want to hear about changes.
//!
//! # How the Store Works
//!
//! 1. Views read the state through [`Store::read`].
//!
//! 2. [`Store::commit`] takes the write lock, applies one mutation and
//!    releases the lock.
//!
//! 3. If the mutation succeeded, every subscriber is called with it.
//!
//! Subscribers are called from a snapshot taken after the state lock is
//! released, so a callback may read the store, subscribe or unsubscribe.
//! Changes to the subscriber list apply from the next commit. A callback
//! that commits is notified of its own mutation and must not recurse
//! without bound.
//!
//! # Thread Safety
//!
//! State and subscribers sit behind `parking_lot` RwLocks. The UI normally
//! drives the store from a single thread; the locks only make handles safe
//! to share with host bindings.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use super::subscriber::{Subscriber, SubscriberId};
use crate::error::StoreResult;
use crate::graph::{Dataset, TapestryState};
use crate::mutations::Mutation;
use crate::permissions::Session;

/// Shared handle to the tapestry state.
///
/// # Example
///
/// ```rust,ignore
/// let store = Store::from_dataset(dataset);
///
/// store.subscribe(|mutation| println!("applied {mutation:?}"));
///
/// store.commit(Mutation::Select(node_id))?;
/// let selected = store.read(|state| state.selection().to_vec());
/// ```
pub struct Store {
    state: Arc<RwLock<TapestryState>>,
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
}

impl Store {
    /// Create a store around an existing state.
    pub fn new(state: TapestryState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
            subscribers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store and load `dataset` into it.
    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(TapestryState::from_dataset(dataset))
    }

    /// Run `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&TapestryState) -> R) -> R {
        f(&*self.state.read())
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> TapestryState {
        self.state.read().clone()
    }

    /// Apply `mutation` and notify subscribers.
    ///
    /// A failed mutation leaves the state unchanged and notifies no one.
    pub fn commit(&self, mutation: Mutation) -> StoreResult<()> {
        trace!(?mutation, "commit");
        if self.subscribers.read().is_empty() {
            return self.state.write().apply(mutation);
        }

        self.state.write().apply(mutation.clone())?;
        self.notify_subscribers(&mutation);
        Ok(())
    }

    /// Recompute which nodes `session` can see and commit the result.
    pub fn refresh_visible_nodes(&self, session: &dyn Session) -> StoreResult<()> {
        let visible = self.read(|state| state.visible_node_ids(session));
        self.commit(Mutation::UpdateVisibleNodes(visible))
    }

    /// Register a callback for committed mutations.
    pub fn subscribe<F>(&self, notify: F) -> SubscriberId
    where
        F: Fn(&Mutation) + Send + Sync + 'static,
    {
        let subscriber = Subscriber::new(notify);
        let id = subscriber.id();
        self.subscribers.write().push(subscriber);
        id
    }

    /// Remove a subscriber.
    pub fn unsubscribe(&self, subscriber_id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id() != subscriber_id);
    }

    /// Get the number of subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    fn notify_subscribers(&self, mutation: &Mutation) {
        let subscribers = self.subscribers.read().clone();
        for subscriber in &subscribers {
            subscriber.notify(mutation);
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(TapestryState::new())
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Store")
            .field("nodes", &state.node_count())
            .field("links", &state.links().len())
            .field("loaded", &state.is_loaded())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
