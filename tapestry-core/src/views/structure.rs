//! Structural views: parent/child relations, accordions and favourites.

use std::collections::HashSet;

use crate::graph::{Node, NodeId, TapestryState};

impl TapestryState {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Targets of every link leaving `id`, in link order.
    pub fn direct_children(&self, id: NodeId) -> Vec<NodeId> {
        self.links
            .iter()
            .filter(|link| link.source == id)
            .map(|link| link.target)
            .collect()
    }

    /// Sources of every link entering `id`, in link order.
    pub fn direct_parents(&self, id: NodeId) -> Vec<NodeId> {
        self.links
            .iter()
            .filter(|link| link.target == id)
            .map(|link| link.source)
            .collect()
    }

    /// The source of the first link entering `id`.
    ///
    /// Nodes have at most one parent in a well-formed map; extra parents are
    /// ignored here.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.links
            .iter()
            .find(|link| link.target == id)
            .map(|link| link.source)
    }

    /// An accordion node, or a node nested directly inside one.
    pub fn is_accordion(&self, id: NodeId) -> bool {
        match self.node(id) {
            Some(node) => node.is_accordion_type() || self.is_sub_accordion(id),
            None => false,
        }
    }

    /// Whether the parent of `id` is an accordion.
    pub fn is_sub_accordion(&self, id: NodeId) -> bool {
        self.parent(id)
            .and_then(|parent| self.node(parent))
            .is_some_and(Node::is_accordion_type)
    }

    /// Whether `id` is a row of an accordion.
    ///
    /// With `accordion` given, the row must belong to that accordion;
    /// otherwise any accordion (or sub-accordion) parent counts.
    pub fn is_accordion_row(&self, id: NodeId, accordion: Option<NodeId>) -> bool {
        let Some(parent) = self.parent(id) else {
            return false;
        };
        match accordion {
            Some(accordion) => parent == accordion,
            None => self.is_accordion(parent),
        }
    }

    /// Whether any node on the way from `id` to the root sits directly
    /// inside an accordion.
    pub fn has_accordion_ancestor(&self, id: NodeId) -> bool {
        let mut visited = HashSet::from([id]);
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            if self.is_sub_accordion(current) {
                return true;
            }
            if !visited.insert(parent) {
                tracing::warn!(node = %id, at = %parent, "cycle in parent chain");
                return false;
            }
            current = parent;
        }
        false
    }

    pub fn favourites(&self) -> &[NodeId] {
        &self.favourites
    }

    pub fn is_favourite(&self, id: NodeId) -> bool {
        self.favourites.contains(&id)
    }

    /// A fresh node built from the default template and current settings.
    pub fn create_default_node(&self) -> Node {
        Node::template(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{NodeId, TapestryState};
    use crate::views::tests::{id, state};
    use serde_json::json;

    /// 1 → 2 (accordion) → 3 → 4, plus 1 → 5.
    fn accordion_map() -> TapestryState {
        state(json!({
            "rootId": 1,
            "nodes": [
                { "id": 1, "nodeType": "root" },
                { "id": 2, "nodeType": "child", "mediaType": "accordion" },
                { "id": 3, "nodeType": "child" },
                { "id": 4, "nodeType": "child" },
                { "id": 5, "nodeType": "child" },
            ],
            "links": [
                { "source": 1, "target": 2 },
                { "source": 2, "target": 3 },
                { "source": 3, "target": 4 },
                { "source": 1, "target": 5 },
            ],
        }))
    }

    #[test]
    fn children_and_parents() {
        let map = accordion_map();
        assert_eq!(map.direct_children(id(1)), vec![id(2), id(5)]);
        assert_eq!(map.direct_parents(id(3)), vec![id(2)]);
        assert_eq!(map.parent(id(4)), Some(id(3)));
        assert_eq!(map.parent(id(1)), None);
        assert!(map.direct_children(NodeId::new(42)).is_empty());
    }

    #[test]
    fn accordion_membership() {
        let map = accordion_map();
        assert!(map.is_accordion(id(2)));
        assert!(map.is_sub_accordion(id(3)));
        assert!(map.is_accordion(id(3)));
        assert!(!map.is_accordion(id(4)));
        assert!(!map.is_accordion(id(5)));
        assert!(!map.is_accordion(NodeId::new(42)));
    }

    #[test]
    fn accordion_rows() {
        let map = accordion_map();
        assert!(map.is_accordion_row(id(3), None));
        assert!(map.is_accordion_row(id(3), Some(id(2))));
        assert!(!map.is_accordion_row(id(3), Some(id(1))));
        // 4 hangs off a sub-accordion, which is itself an accordion.
        assert!(map.is_accordion_row(id(4), None));
        assert!(!map.is_accordion_row(id(1), None));
    }

    #[test]
    fn accordion_ancestors() {
        let map = accordion_map();
        assert!(map.has_accordion_ancestor(id(3)));
        assert!(map.has_accordion_ancestor(id(4)));
        assert!(!map.has_accordion_ancestor(id(2)));
        assert!(!map.has_accordion_ancestor(id(5)));
        assert!(!map.has_accordion_ancestor(id(1)));
    }

    #[test]
    fn ancestor_walk_terminates_on_cycles() {
        let map = state(json!({
            "nodes": [
                { "id": 1, "nodeType": "child" },
                { "id": 2, "nodeType": "child" },
            ],
            "links": [
                { "source": 1, "target": 2 },
                { "source": 2, "target": 1 },
            ],
        }));
        assert!(!map.has_accordion_ancestor(id(1)));
    }

    #[test]
    fn default_node_follows_settings() {
        let map = state(json!({
            "settings": { "defaultPermissions": { "public": [] } },
        }));
        let node = map.create_default_node();
        assert_eq!(node.permissions.get("public"), Some(&[][..]));
    }
}
