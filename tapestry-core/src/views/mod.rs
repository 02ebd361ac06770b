//! Derived Views
//!
//! Read-only queries over [`TapestryState`](crate::graph::TapestryState).
//! Every view is a `&self` method, so a view can never change the graph.
//!
//! Unknown ids are not errors here: a missing node has no children, is not
//! an accordion, and is never visible.
//!
//! - `structure`: children, parents, accordions, favourites
//! - `visibility`: what the current caller may see
//! - `quiz`: activities, questions and recorded answers
//! - `traversal`: neighbours and undirected reachability
//! - `export`: the dataset written back to the host

mod export;
mod quiz;
mod structure;
mod traversal;
mod visibility;

#[cfg(test)]
pub(crate) mod tests {
    use crate::graph::{Dataset, NodeId, TapestryState};

    pub fn id(raw: u64) -> NodeId {
        NodeId::new(raw)
    }

    /// Load a state from an inline JSON dataset.
    pub fn state(dataset: serde_json::Value) -> TapestryState {
        let dataset: Dataset = serde_json::from_value(dataset).expect("valid dataset");
        TapestryState::from_dataset(dataset)
    }
}
