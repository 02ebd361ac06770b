//! Graph Nodes
//!
//! This module defines the node record stored in the graph: a lesson,
//! module, quiz or any other content unit of the learning map.
//!
//! Nodes arrive from the host as JSON. Fields the store reasons about are
//! typed; everything else is kept in `extra` so that a dataset loaded and
//! exported again loses nothing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::id::{NodeId, UserId};
use super::quiz::Question;
use crate::error::StoreResult;
use crate::helpers;
use crate::settings::Settings;

/// Publication status of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Publish,
    Draft,
}

/// Review workflow state. Absent means the node was never submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Submit,
    Accept,
    Reject,
}

/// An action a caller may perform on a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Add,
    Edit,
}

/// Node author as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Author {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            extra: Map::new(),
        }
    }
}

/// Per-node access lists.
///
/// Keys are `"public"`, `"authenticated"`, a role name, or `"user-<id>"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(IndexMap<String, Vec<Action>>);

impl Permissions {
    pub const PUBLIC: &'static str = "public";
    pub const AUTHENTICATED: &'static str = "authenticated";

    pub fn new() -> Self {
        Self::default()
    }

    /// Public and authenticated read, the template default.
    pub fn public_read() -> Self {
        Self::new()
            .with(Self::PUBLIC, [Action::Read])
            .with(Self::AUTHENTICATED, [Action::Read])
    }

    /// Key under which a single user's permissions are stored.
    pub fn user_key(id: UserId) -> String {
        format!("user-{id}")
    }

    /// Builder-style variant of [`Permissions::set`].
    pub fn with(mut self, key: impl Into<String>, actions: impl IntoIterator<Item = Action>) -> Self {
        self.set(key, actions);
        self
    }

    /// Replace the action list stored under `key`.
    pub fn set(&mut self, key: impl Into<String>, actions: impl IntoIterator<Item = Action>) {
        self.0.insert(key.into(), actions.into_iter().collect());
    }

    /// Actions listed under `key`, if the key is present.
    pub fn get(&self, key: &str) -> Option<&[Action]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Whether the list under `key` includes `action`. A missing key allows nothing.
    pub fn allows(&self, key: &str, action: Action) -> bool {
        self.get(key).is_some_and(|actions| actions.contains(&action))
    }
}

/// An unlock condition attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub fulfilled: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Condition {
    pub fn new(kind: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
            fulfilled: false,
            extra: Map::new(),
        }
    }

    /// Conditions are identified by their type and value.
    pub fn matches(&self, other: &Condition) -> bool {
        self.kind == other.kind && self.value == other.value
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// One slice of the progress ring drawn around a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressSlice {
    pub value: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Media-specific fields. Only progress is interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub progress: Vec<ProgressSlice>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

/// A node in the learning map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub id: NodeId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub media_type: String,

    /// An empty node type marks a placeholder that is never shown.
    #[serde(default)]
    pub node_type: String,

    #[serde(default)]
    pub status: NodeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_status: Option<ReviewStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,

    #[serde(default)]
    pub permissions: Permissions,

    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default = "default_true")]
    pub unlocked: bool,

    #[serde(default = "default_true")]
    pub accessible: bool,

    /// Display order of this node's children.
    #[serde(default)]
    pub child_ordering: Vec<NodeId>,

    #[serde(default)]
    pub quiz: Vec<Question>,

    #[serde(default)]
    pub coordinates: Coordinates,

    #[serde(default)]
    pub progress: f64,

    #[serde(default)]
    pub type_data: TypeData,

    /// Fields the store passes through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    pub const ACCORDION: &'static str = "accordion";

    /// Create a node from the default template.
    pub fn new(id: NodeId, settings: &Settings) -> Self {
        let mut node = Self::template(settings);
        node.id = id;
        node
    }

    /// The bare default node for the given settings.
    pub fn template(settings: &Settings) -> Self {
        let permissions = settings
            .default_permissions
            .clone()
            .unwrap_or_else(Permissions::public_read);
        let mut extra = Map::new();
        for (key, value) in default_extra_fields() {
            extra.insert(key.to_string(), value);
        }
        Self {
            id: NodeId::default(),
            title: String::new(),
            media_type: "text".to_string(),
            node_type: "child".to_string(),
            status: NodeStatus::Publish,
            review_status: None,
            author: None,
            permissions,
            conditions: Vec::new(),
            unlocked: true,
            accessible: true,
            child_ordering: Vec::new(),
            quiz: Vec::new(),
            coordinates: Coordinates { x: 3000.0, y: 3000.0 },
            progress: 0.0,
            type_data: TypeData {
                progress: Vec::new(),
                extra: default_type_data(),
            },
            extra,
        }
    }

    /// Build a node from the default template deep-merged with `overrides`.
    ///
    /// Objects in `overrides` merge into the template recursively; arrays and
    /// scalars replace the template value.
    pub fn with_overrides(settings: &Settings, overrides: &Value) -> StoreResult<Self> {
        let base = serde_json::to_value(Self::template(settings))?;
        let merged = helpers::deep_merge(&base, overrides);
        Ok(serde_json::from_value(merged)?)
    }

    pub fn is_draft(&self) -> bool {
        self.status == NodeStatus::Draft
    }

    pub fn is_accordion_type(&self) -> bool {
        self.media_type == Self::ACCORDION
    }

    /// Whether every unlock condition has been fulfilled.
    pub fn conditions_met(&self) -> bool {
        self.conditions.iter().all(|c| c.fulfilled)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.quiz.iter().find(|q| q.id.as_str() == id)
    }

    pub fn question_mut(&mut self, id: &str) -> Option<&mut Question> {
        self.quiz.iter_mut().find(|q| q.id.as_str() == id)
    }
}

fn default_extra_fields() -> [(&'static str, Value); 17] {
    [
        ("type", json!("tapestry_node")),
        ("description", json!("")),
        ("behaviour", json!("new-window")),
        ("imageURL", json!("")),
        ("lockedImageURL", json!("")),
        ("mediaFormat", json!("")),
        ("mediaDuration", json!(0)),
        ("typeId", json!(1)),
        ("group", json!(1)),
        ("hideTitle", json!(false)),
        ("hideProgress", json!(false)),
        ("hideMedia", json!(false)),
        ("skippable", json!(true)),
        ("fullscreen", json!(false)),
        ("license", json!("")),
        ("references", json!("")),
        ("reviewComments", json!([])),
    ]
}

fn default_type_data() -> Map<String, Value> {
    let mut data = Map::new();
    data.insert("linkMetadata".to_string(), Value::Null);
    data.insert("mediaURL".to_string(), json!(""));
    data.insert("mediaWidth".to_string(), json!(960));
    data.insert("mediaHeight".to_string(), json!(600));
    data.insert("subAccordionText".to_string(), json!("More content:"));
    data
}
