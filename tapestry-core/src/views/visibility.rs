//! Visibility of nodes for the current caller.

use crate::graph::{Action, NodeId, TapestryState};
use crate::permissions::{has_permission, Session};

impl TapestryState {
    /// Whether `session` may perform `action` on node `id`.
    pub fn can(&self, id: NodeId, action: Action, session: &dyn Session) -> bool {
        self.node(id).is_some_and(|node| {
            has_permission(Some(node), action, self.settings.show_rejected, session)
        })
    }

    /// Whether node `id` is shown to `session`.
    ///
    /// Placeholders (empty node type) are never shown. Readers who cannot
    /// edit see accordion contents only through the accordion itself, so
    /// nodes below an accordion are hidden from the map for them.
    pub fn is_visible(&self, id: NodeId, session: &dyn Session) -> bool {
        let Some(node) = self.node(id) else {
            return false;
        };
        if node.node_type.is_empty() {
            return false;
        }
        let show_rejected = self.settings.show_rejected;
        if !has_permission(Some(node), Action::Read, show_rejected, session) {
            return false;
        }
        if !has_permission(Some(node), Action::Edit, show_rejected, session) {
            return !self.has_accordion_ancestor(id);
        }
        true
    }

    /// Ids of every node visible to `session`, in node order.
    pub fn visible_node_ids(&self, session: &dyn Session) -> Vec<NodeId> {
        self.nodes
            .keys()
            .copied()
            .filter(|&id| self.is_visible(id, session))
            .collect()
    }
}
