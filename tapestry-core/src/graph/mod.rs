//! Graph Store
//!
//! This module holds the learning map as an in-memory graph.
//!
//! # Overview
//!
//! The graph is a set of nodes keyed by id plus an ordered list of directed
//! links where:
//!
//! - Nodes are content units (lessons, modules, quizzes, accordions)
//! - A link from A to B makes B a child of A
//!
//! Every other part of the crate reads or writes the graph through
//! [`TapestryState`].
//!
//! # Assumptions
//!
//! 1. Link endpoints reference existing nodes. This is a precondition of the
//!    mutations, not something they check.
//!
//! 2. The parent structure is tree-shaped: a node has at most one parent.
//!    Ancestor walks still carry a visited set so a malformed dataset cannot
//!    make them loop.

mod id;
mod link;
mod node;
mod quiz;
mod state;

pub use id::{NodeId, UserId};
pub use link::Link;
pub use node::{
    Action, Author, Condition, Coordinates, Node, NodeStatus, Permissions, ProgressSlice,
    ReviewStatus, TypeData,
};
pub use quiz::{AnswerType, FormattedEntry, Question, QuestionId};
pub use state::{Dataset, TapestryState};

pub(crate) use id::parse_int_prefix;
