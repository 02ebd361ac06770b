//! Mutations
//!
//! Every change to the graph goes through one of the `&mut self` methods
//! below. Each is also available as a [`Mutation`] value so a UI can drive
//! the store with JSON commands:
//!
//! ```json
//! { "type": "completeQuestion", "payload": { "nodeId": 4, "questionId": "q1" } }
//! ```
//!
//! Mutations addressing a node, question or link that does not exist fail
//! with a [`StoreError`] and leave the state untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::graph::{
    AnswerType, Condition, Dataset, Link, Node, NodeId, ProgressSlice, QuestionId,
    TapestryState,
};
use crate::settings::Settings;

/// A state change, as sent by the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Mutation {
    Init(Dataset),
    SetDataset(Dataset),
    UpdateSettings(Settings),
    UpdateH5pSettings(Value),
    UpdateSelectedNode(NodeId),
    UpdateRootNode(NodeId),
    AddNode(Node),
    DeleteNode(NodeId),
    #[serde(rename_all = "camelCase")]
    UpdateNode {
        id: NodeId,
        new_node: Map<String, Value>,
    },
    UpdateNodeProgress {
        id: NodeId,
        progress: f64,
    },
    UpdateNodeCoordinates {
        id: NodeId,
        coordinates: Map<String, Value>,
    },
    FulfillNodeCondition {
        id: NodeId,
        condition: Condition,
    },
    Select(NodeId),
    Unselect(NodeId),
    ClearSelection,
    AddLink(Link),
    DeleteLink(usize),
    #[serde(rename_all = "camelCase")]
    CompleteQuestion {
        node_id: NodeId,
        question_id: QuestionId,
    },
    #[serde(rename_all = "camelCase")]
    UpdateEntry {
        node_id: NodeId,
        question_id: QuestionId,
        answer_type: AnswerType,
        entry: Map<String, Value>,
    },
    UpdateFavourites {
        favourites: Vec<NodeId>,
    },
    InitializeOrdering(NodeId),
    UpdateOrdering {
        id: NodeId,
        ord: Vec<NodeId>,
    },
    UpdateVisibleNodes(Vec<NodeId>),
}

impl TapestryState {
    /// Apply a single mutation.
    pub fn apply(&mut self, mutation: Mutation) -> StoreResult<()> {
        match mutation {
            Mutation::Init(dataset) => self.init(dataset),
            Mutation::SetDataset(dataset) => self.set_dataset(dataset),
            Mutation::UpdateSettings(settings) => self.update_settings(settings),
            Mutation::UpdateH5pSettings(settings) => self.update_h5p_settings(settings),
            Mutation::UpdateSelectedNode(id) => self.update_selected_node(id),
            Mutation::UpdateRootNode(id) => self.update_root_node(id),
            Mutation::AddNode(node) => self.add_node(node),
            Mutation::DeleteNode(id) => self.delete_node(id),
            Mutation::UpdateNode { id, new_node } => return self.update_node(id, new_node),
            Mutation::UpdateNodeProgress { id, progress } => {
                return self.update_node_progress(id, progress)
            }
            Mutation::UpdateNodeCoordinates { id, coordinates } => {
                return self.update_node_coordinates(id, coordinates)
            }
            Mutation::FulfillNodeCondition { id, condition } => {
                return self.fulfill_node_condition(id, &condition)
            }
            Mutation::Select(id) => self.select(id),
            Mutation::Unselect(id) => self.unselect(id),
            Mutation::ClearSelection => self.clear_selection(),
            Mutation::AddLink(link) => self.add_link(link),
            Mutation::DeleteLink(index) => return self.delete_link(index),
            Mutation::CompleteQuestion { node_id, question_id } => {
                return self.complete_question(node_id, &question_id)
            }
            Mutation::UpdateEntry {
                node_id,
                question_id,
                answer_type,
                entry,
            } => return self.update_entry(node_id, &question_id, answer_type, entry),
            Mutation::UpdateFavourites { favourites } => self.update_favourites(favourites),
            Mutation::InitializeOrdering(id) => return self.initialize_ordering(id),
            Mutation::UpdateOrdering { id, ord } => return self.update_ordering(id, ord),
            Mutation::UpdateVisibleNodes(nodes) => self.update_visible_nodes(nodes),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Dataset
    // ------------------------------------------------------------------------

    /// Load a full dataset: select the root, reconcile accordion orderings
    /// and mark every node visible.
    pub fn init(&mut self, dataset: Dataset) {
        self.set_dataset(dataset);
        self.selected_node_id = self.root_id;
        self.loaded = true;

        let accordions: Vec<NodeId> = self
            .nodes
            .keys()
            .copied()
            .filter(|&id| self.is_accordion(id))
            .collect();
        for id in accordions {
            self.reconcile_ordering(id);
        }

        self.visible_nodes = self.nodes.keys().copied().collect();
        debug!(
            nodes = self.nodes.len(),
            links = self.links.len(),
            root = ?self.root_id,
            "tapestry loaded"
        );
    }

    /// Replace the dataset fields without any of the `init` side effects.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.nodes = dataset.nodes.into_iter().map(|node| (node.id, node)).collect();
        self.links = dataset.links;
        self.groups = dataset.groups;
        self.root_id = dataset.root_id;
        self.settings = dataset.settings;
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn update_h5p_settings(&mut self, settings: Value) {
        self.h5p_settings = settings;
    }

    pub fn update_selected_node(&mut self, id: NodeId) {
        self.selected_node_id = Some(id);
    }

    pub fn update_root_node(&mut self, id: NodeId) {
        self.root_id = Some(id);
    }

    // ------------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------------

    /// Add a node. A node with the same id is replaced in place.
    pub fn add_node(&mut self, node: Node) {
        let id = node.id;
        if self.nodes.insert(id, node).is_some() {
            warn!(node = %id, "add_node replaced an existing node");
        } else {
            debug!(node = %id, "node added");
        }
    }

    /// Remove a node. Links touching it are left for the caller to delete.
    pub fn delete_node(&mut self, id: NodeId) {
        if self.nodes.shift_remove(&id).is_some() {
            debug!(node = %id, "node deleted");
        }
    }

    /// Shallow-merge `patch` into node `id`.
    ///
    /// Top-level fields in `patch` replace the node's; the id itself cannot
    /// be changed this way.
    pub fn update_node(&mut self, id: NodeId, patch: Map<String, Value>) -> StoreResult<()> {
        let node = self.existing_node_mut(id)?;
        let mut record = match serde_json::to_value(&*node)? {
            Value::Object(record) => record,
            _ => Map::new(),
        };
        for (key, value) in patch {
            if key != "id" {
                record.insert(key, value);
            }
        }
        *node = serde_json::from_value(Value::Object(record))?;
        debug!(node = %id, "node updated");
        Ok(())
    }

    /// Set the completed share of a node's progress ring.
    pub fn update_node_progress(&mut self, id: NodeId, progress: f64) -> StoreResult<()> {
        let node = self.existing_node_mut(id)?;
        let slices = &mut node.type_data.progress;
        if slices.len() < 2 {
            slices.resize_with(2, ProgressSlice::default);
        }
        slices[0].value = progress;
        slices[1].value = 1.0 - progress;
        debug!(node = %id, progress, "progress updated");
        Ok(())
    }

    /// Copy every key of `coordinates` onto node `id`.
    ///
    /// `x` and `y` move the node's coordinates and must be numbers. Any
    /// other key, such as the pinned `fx`/`fy`, is stored on the node as
    /// given. Keys left out of `coordinates` keep their current value.
    pub fn update_node_coordinates(
        &mut self,
        id: NodeId,
        coordinates: Map<String, Value>,
    ) -> StoreResult<()> {
        let node = self.existing_node_mut(id)?;
        let invalid = coordinates
            .iter()
            .find(|(key, value)| matches!(key.as_str(), "x" | "y") && !value.is_number());
        if let Some((key, value)) = invalid {
            return Err(StoreError::InvalidCoordinate {
                key: key.clone(),
                value: value.clone(),
            });
        }

        for (key, value) in coordinates {
            match (key.as_str(), value.as_f64()) {
                ("x", Some(x)) => node.coordinates.x = x,
                ("y", Some(y)) => node.coordinates.y = y,
                _ => {
                    node.extra.insert(key, value);
                }
            }
        }
        Ok(())
    }

    /// Position node `id` at (`x`, `y`) on the fields the layout mode uses.
    pub fn move_node(&mut self, id: NodeId, x: f64, y: f64) -> StoreResult<()> {
        let coordinates = self.settings.position(x, y);
        self.update_node_coordinates(id, coordinates)
    }

    /// Mark the condition matching `condition` (by type and value) fulfilled.
    ///
    /// Once every condition of the node is fulfilled the node becomes
    /// unlocked and accessible. Nothing here ever locks a node again.
    pub fn fulfill_node_condition(&mut self, id: NodeId, condition: &Condition) -> StoreResult<()> {
        let node = self.existing_node_mut(id)?;
        let Some(target) = node.conditions.iter_mut().find(|c| c.matches(condition)) else {
            debug!(node = %id, kind = %condition.kind, "no matching condition");
            return Ok(());
        };
        target.fulfilled = true;
        if node.conditions_met() {
            node.unlocked = true;
            node.accessible = true;
            debug!(node = %id, "node unlocked");
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    /// Add `id` to the selection unless it is already selected.
    pub fn select(&mut self, id: NodeId) {
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
    }

    pub fn unselect(&mut self, id: NodeId) {
        self.selection.retain(|&selected| selected != id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ------------------------------------------------------------------------
    // Links
    // ------------------------------------------------------------------------

    pub fn add_link(&mut self, link: Link) {
        debug!(source = %link.source, target = %link.target, "link added");
        self.links.push(link);
    }

    /// Remove the link at position `index`.
    pub fn delete_link(&mut self, index: usize) -> StoreResult<()> {
        if index >= self.links.len() {
            warn!(index, len = self.links.len(), "delete_link out of range");
            return Err(StoreError::LinkIndexOutOfRange {
                index,
                len: self.links.len(),
            });
        }
        let link = self.links.remove(index);
        debug!(source = %link.source, target = %link.target, "link deleted");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Quizzes
    // ------------------------------------------------------------------------

    /// Mark a question completed. Completion is never undone here.
    pub fn complete_question(&mut self, node_id: NodeId, question_id: &QuestionId) -> StoreResult<()> {
        let node = self.existing_node_mut(node_id)?;
        let question = node
            .question_mut(question_id.as_str())
            .ok_or_else(|| question_not_found(node_id, question_id))?;
        question.completed = true;
        debug!(node = %node_id, question = %question_id, "question completed");
        Ok(())
    }

    /// Record an answer: the first value of `entry` is stored under
    /// `answer_type` in the question's entries.
    pub fn update_entry(
        &mut self,
        node_id: NodeId,
        question_id: &QuestionId,
        answer_type: AnswerType,
        entry: Map<String, Value>,
    ) -> StoreResult<()> {
        let node = self.existing_node_mut(node_id)?;
        let question = node
            .question_mut(question_id.as_str())
            .ok_or_else(|| question_not_found(node_id, question_id))?;
        let entries = question.entries.get_or_insert_with(Map::new);
        if let Some((_, value)) = entry.into_iter().next() {
            entries.insert(answer_type.key().to_string(), value);
        }
        debug!(node = %node_id, question = %question_id, ?answer_type, "entry recorded");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Favourites, ordering and visibility
    // ------------------------------------------------------------------------

    pub fn update_favourites(&mut self, favourites: Vec<NodeId>) {
        self.favourites = favourites;
    }

    /// Bring the child ordering of `id` in line with its current children.
    ///
    /// New children are appended in link order, departed ones are dropped,
    /// and the relative order of the rest is kept. Running it again without
    /// a change in children leaves the ordering as it is.
    pub fn initialize_ordering(&mut self, id: NodeId) -> StoreResult<()> {
        if !self.nodes.contains_key(&id) {
            return Err(StoreError::NodeNotFound(id));
        }
        self.reconcile_ordering(id);
        Ok(())
    }

    /// Replace the child ordering of `id` wholesale. `ord` is trusted as is.
    pub fn update_ordering(&mut self, id: NodeId, ord: Vec<NodeId>) -> StoreResult<()> {
        self.existing_node_mut(id)?.child_ordering = ord;
        Ok(())
    }

    pub fn update_visible_nodes(&mut self, nodes: Vec<NodeId>) {
        self.visible_nodes = nodes;
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn existing_node_mut(&mut self, id: NodeId) -> StoreResult<&mut Node> {
        self.node_mut(id).inspect_err(|_| warn!(node = %id, "unknown node"))
    }

    fn reconcile_ordering(&mut self, id: NodeId) {
        let children = self.direct_children(id);
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let ordering = &mut node.child_ordering;
        for child in &children {
            if !ordering.contains(child) {
                ordering.push(*child);
            }
        }
        ordering.retain(|child| children.contains(child));
    }
}

fn question_not_found(node: NodeId, question: &QuestionId) -> StoreError {
    warn!(node = %node, question = %question, "unknown question");
    StoreError::QuestionNotFound {
        node,
        question: question.clone(),
    }
}
