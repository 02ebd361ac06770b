//! Graph Links
//!
//! A link is a directed edge from a parent node to a child node.
//!
//! Layout engines on the page replace link endpoints with the node objects
//! themselves, so an endpoint deserializes from an id, a numeric string, or
//! any object carrying an `id` field. Endpoints always serialize as ids.

use serde::{Deserialize, Deserializer, Serialize};

use super::id::NodeId;

/// A directed edge between two nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    #[serde(deserialize_with = "endpoint")]
    pub source: NodeId,
    #[serde(deserialize_with = "endpoint")]
    pub target: NodeId,
}

impl Link {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    /// Whether `id` is either end of this link.
    pub fn touches(&self, id: NodeId) -> bool {
        self.source == id || self.target == id
    }

    /// The end of this link opposite `id`, if `id` is one of its ends.
    pub fn other_end(&self, id: NodeId) -> Option<NodeId> {
        if self.source == id {
            Some(self.target)
        } else if self.target == id {
            Some(self.source)
        } else {
            None
        }
    }
}

fn endpoint<'de, D>(deserializer: D) -> Result<NodeId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Endpoint {
        Id(NodeId),
        Node { id: NodeId },
    }

    Ok(match Endpoint::deserialize(deserializer)? {
        Endpoint::Id(id) | Endpoint::Node { id } => id,
    })
}
