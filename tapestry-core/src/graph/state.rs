//! Graph Store State
//!
//! `TapestryState` owns everything the map shows: the node collection, the
//! ordered link list, and the per-session UI state (selection, favourites,
//! visible nodes). Derived views read it through `&self`; mutations change
//! it through `&mut self`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::id::NodeId;
use super::link::Link;
use super::node::Node;
use crate::error::{StoreError, StoreResult};
use crate::settings::Settings;

/// The dataset shape exchanged with the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub groups: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_id: Option<NodeId>,
    #[serde(default)]
    pub settings: Settings,
}

impl Dataset {
    pub fn from_json(json: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// In-memory graph of nodes and links plus session UI state.
#[derive(Debug, Clone, Default)]
pub struct TapestryState {
    pub(crate) nodes: IndexMap<NodeId, Node>,
    pub(crate) links: Vec<Link>,
    pub(crate) groups: Vec<Value>,
    pub(crate) root_id: Option<NodeId>,
    pub(crate) settings: Settings,
    pub(crate) h5p_settings: Value,
    pub(crate) selected_node_id: Option<NodeId>,
    pub(crate) selection: Vec<NodeId>,
    pub(crate) favourites: Vec<NodeId>,
    pub(crate) visible_nodes: Vec<NodeId>,
    pub(crate) loaded: bool,
}

impl TapestryState {
    /// Create an empty, unloaded state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state and load `dataset` into it.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut state = Self::new();
        state.init(dataset);
        state
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn groups(&self) -> &[Value] {
        &self.groups
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn h5p_settings(&self) -> &Value {
        &self.h5p_settings
    }

    pub fn selected_node_id(&self) -> Option<NodeId> {
        self.selected_node_id
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn visible_nodes(&self) -> &[NodeId] {
        &self.visible_nodes
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> StoreResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(StoreError::NodeNotFound(id))
    }
}
