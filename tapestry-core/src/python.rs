//! Python Bindings
//!
//! Exposes the store to a Python host process. Datasets, sessions and
//! mutations cross the boundary as JSON strings, the same shapes the
//! browser UI uses.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::StoreError;
use crate::graph::{AnswerType, Dataset, NodeId};
use crate::mutations::Mutation;
use crate::permissions::Caller;
use crate::reactive::Store;

impl From<StoreError> for PyErr {
    fn from(err: StoreError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> PyResult<T> {
    serde_json::from_str(json).map_err(|e| PyValueError::new_err(format!("invalid JSON: {e}")))
}

/// Python-exposed tapestry store.
#[pyclass(name = "Tapestry")]
pub struct PyTapestry {
    store: Store,
    caller: Caller,
}

#[pymethods]
impl PyTapestry {
    /// Load a dataset for the given session.
    #[new]
    #[pyo3(signature = (dataset_json, session_json = "{}"))]
    fn new(dataset_json: &str, session_json: &str) -> PyResult<Self> {
        let dataset: Dataset = parse(dataset_json)?;
        let caller: Caller = parse(session_json)?;
        Ok(Self {
            store: Store::from_dataset(dataset),
            caller,
        })
    }

    /// Apply a mutation given as `{"type": ..., "payload": ...}`.
    fn commit(&self, mutation_json: &str) -> PyResult<()> {
        let mutation: Mutation = parse(mutation_json)?;
        Ok(self.store.commit(mutation)?)
    }

    /// Move a node to (`x`, `y`) on the fields the layout mode uses.
    fn move_node(&self, id: u64, x: f64, y: f64) -> PyResult<()> {
        let coordinates = self.store.read(|state| state.settings().position(x, y));
        Ok(self.store.commit(Mutation::UpdateNodeCoordinates {
            id: NodeId::new(id),
            coordinates,
        })?)
    }

    /// Recompute the visible node list for this session.
    fn refresh_visible_nodes(&self) -> PyResult<Vec<u64>> {
        self.store.refresh_visible_nodes(&self.caller)?;
        Ok(self
            .store
            .read(|state| state.visible_nodes().iter().map(NodeId::raw).collect()))
    }

    fn is_visible(&self, id: u64) -> bool {
        self.store
            .read(|state| state.is_visible(NodeId::new(id), &self.caller))
    }

    fn children(&self, id: u64) -> Vec<u64> {
        self.store.read(|state| {
            state
                .direct_children(NodeId::new(id))
                .iter()
                .map(NodeId::raw)
                .collect()
        })
    }

    fn has_path(&self, source: u64, target: u64) -> bool {
        self.store
            .read(|state| state.has_path(NodeId::new(source), NodeId::new(target), &[]))
    }

    /// Formatted answer for a question as JSON, or `None`.
    fn entry(&self, question_id: &str, answer_type: &str) -> PyResult<Option<String>> {
        let answer_type: AnswerType = answer_type.parse().map_err(PyValueError::new_err)?;
        self.store
            .read(|state| state.entry(question_id, answer_type))
            .map(|entry| serde_json::to_string(&entry))
            .transpose()
            .map_err(|e| StoreError::from(e).into())
    }

    /// Export the map with quiz progress stripped.
    fn export_json(&self) -> PyResult<String> {
        Ok(self.store.read(|state| state.tapestry_json()).to_json()?)
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.store)
    }
}
