//! Store Errors
//!
//! Every mutation returns a `StoreResult`. Derived views never fail: an
//! unknown id simply yields `None`, `false` or an empty collection.

use thiserror::Error;

use crate::graph::{NodeId, QuestionId};

/// Errors raised while mutating the graph store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("question {question} not found on node {node}")]
    QuestionNotFound { node: NodeId, question: QuestionId },

    #[error("link index {index} out of range (links: {len})")]
    LinkIndexOutOfRange { index: usize, len: usize },

    #[error("invalid node id: {0:?}")]
    InvalidNodeId(String),

    #[error("coordinate {key} must be a number, got {value}")]
    InvalidCoordinate { key: String, value: serde_json::Value },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
