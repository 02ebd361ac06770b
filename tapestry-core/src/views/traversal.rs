//! Neighbourhood and reachability views.
//!
//! Reachability treats links as undirected edges. The search keeps its own
//! stack and visited set, so deep maps cannot exhaust the call stack.

use std::collections::HashSet;

use smallvec::SmallVec;

use crate::graph::{Link, NodeId, TapestryState};

impl TapestryState {
    /// Nodes linked to `id` in either direction, in link order.
    pub fn neighbours(&self, id: NodeId) -> Vec<NodeId> {
        self.links.iter().filter_map(|link| link.other_end(id)).collect()
    }

    /// Links touching `id` in either direction.
    pub fn neighbouring_links(&self, id: NodeId) -> Vec<&Link> {
        self.links.iter().filter(|link| link.touches(id)).collect()
    }

    /// Whether `to` can be reached from `from` over undirected links,
    /// ignoring the links listed in `exclude`.
    ///
    /// Excluded links are matched by exact source and target.
    pub fn has_path(&self, from: NodeId, to: NodeId, exclude: &[Link]) -> bool {
        let allowed: Vec<&Link> = self
            .links
            .iter()
            .filter(|link| !exclude.contains(link))
            .collect();

        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        let mut visited = HashSet::new();
        stack.push(from);
        visited.insert(from);

        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }
            for neighbour in allowed.iter().filter_map(|link| link.other_end(node)) {
                if visited.insert(neighbour) {
                    stack.push(neighbour);
                }
            }
        }

        tracing::trace!(%from, %to, visited = visited.len(), "no path");
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::tests::{id, state};
    use serde_json::json;

    fn chain() -> TapestryState {
        state(json!({
            "nodes": [
                { "id": 1, "nodeType": "root" },
                { "id": 2, "nodeType": "child" },
                { "id": 3, "nodeType": "child" },
                { "id": 4, "nodeType": "child" },
            ],
            "links": [
                { "source": 1, "target": 2 },
                { "source": 2, "target": 3 },
            ],
        }))
    }

    #[test]
    fn node_reaches_itself() {
        let map = chain();
        for raw in 1..=4 {
            assert!(map.has_path(id(raw), id(raw), &[]));
        }
    }

    #[test]
    fn paths_are_undirected() {
        let map = chain();
        assert!(map.has_path(id(1), id(3), &[]));
        assert!(map.has_path(id(3), id(1), &[]));
        assert!(!map.has_path(id(1), id(4), &[]));
    }

    #[test]
    fn excluded_links_are_not_followed() {
        let map = chain();
        let cut = [Link::new(id(1), id(2))];
        assert!(!map.has_path(id(1), id(3), &cut));
        assert!(map.has_path(id(2), id(3), &cut));

        // Exclusion is by exact direction.
        let reversed = [Link::new(id(2), id(1))];
        assert!(map.has_path(id(1), id(3), &reversed));
    }

    #[test]
    fn deep_chains_do_not_recurse() {
        let depth = 2_000u64;
        let nodes: Vec<_> = (1..=depth).map(|i| json!({ "id": i, "nodeType": "child" })).collect();
        let links: Vec<_> = (1..depth).map(|i| json!({ "source": i, "target": i + 1 })).collect();
        let map = state(json!({ "nodes": nodes, "links": links }));
        assert!(map.has_path(id(1), id(depth), &[]));
    }

    #[test]
    fn neighbours_in_both_directions() {
        let map = chain();
        assert_eq!(map.neighbours(id(2)), vec![id(1), id(3)]);
        assert_eq!(map.neighbouring_links(id(2)).len(), 2);
        assert!(map.neighbours(id(4)).is_empty());
    }
}
