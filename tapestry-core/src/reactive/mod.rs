//! Reactive Store
//!
//! This module wraps [`TapestryState`](crate::graph::TapestryState) in a
//! shared handle that notifies observers whenever the state changes.
//!
//! # Concepts
//!
//! ## Store
//!
//! A Store owns the state. Reads go through [`Store::read`], which hands a
//! shared reference to a closure. Writes go through [`Store::commit`], which
//! applies one [`Mutation`](crate::mutations::Mutation) at a time, so
//! mutations never interleave.
//!
//! ## Subscribers
//!
//! A Subscriber is a callback registered on the store. After a mutation has
//! been applied successfully, every subscriber is called with that mutation.
//! UI layers use this to re-run the views they display.
//!
//! # Implementation Notes
//!
//! The state lock is released before subscribers run, so a subscriber may
//! read the store. Subscribers must not commit from inside the callback.

mod store;
mod subscriber;

pub use store::Store;
pub use subscriber::{Subscriber, SubscriberId};
