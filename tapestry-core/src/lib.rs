//! Tapestry Core
//!
//! This crate provides the client-side state layer of the Tapestry
//! learning map. It implements:
//!
//! - An in-memory graph of nodes (lessons, modules, quizzes) and links
//! - Derived views (children, accordions, visibility, quiz answers, paths)
//! - Mutations applied in response to learner and editor actions
//! - The permission rules deciding who may read or edit a node
//!
//! The crate is designed to be used both as a native Rust library and, with
//! the `python` feature, as a Python extension module via PyO3.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: node, link and quiz records plus the state container
//! - `views`: read-only queries over the state
//! - `mutations`: state changes and the serializable `Mutation` command
//! - `permissions`: the access policy and the host `Session` seam
//! - `reactive`: the shared `Store` handle that notifies subscribers
//! - `helpers`: JSON and string utilities
//!
//! # Example
//!
//! ```rust,ignore
//! use tapestry_core::{Caller, Dataset, Mutation, NodeId, Store};
//!
//! let store = Store::from_dataset(Dataset::from_json(json)?);
//!
//! store.subscribe(|mutation| println!("applied {mutation:?}"));
//!
//! store.commit(Mutation::Select(NodeId::new(4)))?;
//! let visible = store.read(|state| state.is_visible(NodeId::new(4), &Caller::anonymous()));
//! ```

pub mod error;
pub mod graph;
pub mod helpers;
pub mod mutations;
pub mod permissions;
pub mod reactive;
pub mod settings;
mod views;

#[cfg(feature = "python")]
mod python;

pub use error::{StoreError, StoreResult};
pub use graph::{
    Action, AnswerType, Dataset, FormattedEntry, Link, Node, NodeId, Question, QuestionId,
    TapestryState, UserId,
};
pub use mutations::Mutation;
pub use permissions::{has_permission, Caller, Session};
pub use reactive::{Store, SubscriberId};
pub use settings::Settings;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition.
///
/// This function is called by Python when importing the module.
/// It registers all Python-exposed types and functions.
#[cfg(feature = "python")]
#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyTapestry>()?;

    // Add version info
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
