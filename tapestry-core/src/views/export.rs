//! Export of the map back to the host.

use crate::graph::{Dataset, Node, TapestryState};

impl TapestryState {
    /// The current map as a dataset.
    ///
    /// Quiz progress is session-local: every question is exported with
    /// `completed` cleared and no entries.
    pub fn tapestry_json(&self) -> Dataset {
        Dataset {
            nodes: self.nodes.values().map(exported_node).collect(),
            links: self.links.clone(),
            groups: self.groups.clone(),
            root_id: self.root_id,
            settings: self.settings.clone(),
        }
    }
}

fn exported_node(node: &Node) -> Node {
    Node {
        quiz: node.quiz.iter().map(|q| q.without_progress()).collect(),
        ..node.clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::AnswerType;
    use crate::views::tests::{id, state};
    use serde_json::json;

    #[test]
    fn export_strips_quiz_progress() {
        let map = state(json!({
            "rootId": 1,
            "groups": [{ "id": 1, "members": [1] }],
            "nodes": [{
                "id": 1, "nodeType": "root", "description": "intro",
                "quiz": [{ "id": "q1", "completed": true, "entries": { "textId": { "0": "yes" } } }],
            }],
            "links": [],
        }));
        assert!(map.entry("q1", AnswerType::Text).is_some());

        let exported = map.tapestry_json();
        let question = &exported.nodes[0].quiz[0];
        assert!(!question.completed);
        assert!(question.entries.is_none());
        assert_eq!(exported.root_id, Some(id(1)));
        assert_eq!(exported.groups.len(), 1);

        let value = serde_json::to_value(&exported).unwrap();
        assert_eq!(value["nodes"][0]["quiz"][0]["entries"], json!(null));
        assert_eq!(value["nodes"][0]["description"], json!("intro"));

        // The live state keeps its progress.
        assert!(map.question("q1").unwrap().completed);
    }
}
