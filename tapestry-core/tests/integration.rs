//! Integration Tests for the Tapestry Store
//!
//! These tests drive the store the way the UI does: load a dataset, commit
//! mutations, and read views back.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use tapestry_core::graph::{Condition, NodeStatus, ReviewStatus};
use tapestry_core::{
    has_permission, Action, AnswerType, Caller, Dataset, FormattedEntry, Link, Mutation, Node,
    NodeId, QuestionId, Settings, Store, UserId,
};

fn id(raw: u64) -> NodeId {
    NodeId::new(raw)
}

fn load(dataset: Value) -> Store {
    let dataset: Dataset = serde_json::from_value(dataset).expect("valid dataset");
    Store::from_dataset(dataset)
}

/// A single root node, as a freshly created tapestry has.
fn one_node() -> Store {
    load(json!({
        "rootId": 1,
        "nodes": [{
            "id": 1, "title": "Root", "nodeType": "root", "mediaType": "text",
            "permissions": { "public": ["read"], "authenticated": ["read"] },
            "author": { "id": 1 },
        }],
        "links": [],
        "groups": [],
        "settings": { "autoLayout": false },
    }))
}

/// Create a child of `parent` from the default template and link it.
fn add_child(store: &Store, parent: NodeId, child: u64, overrides: Value) -> NodeId {
    let settings = store.read(|state| state.settings().clone());
    let mut overrides = overrides;
    overrides["id"] = json!(child);
    let node = Node::with_overrides(&settings, &overrides).unwrap();
    let child = node.id;
    store.commit(Mutation::AddNode(node)).unwrap();
    store.commit(Mutation::AddLink(Link::new(parent, child))).unwrap();
    child
}

/// Module → stage → question set, created one under the other.
#[test]
fn module_stage_question_set_flow() {
    let store = one_node();
    let root = store.read(|state| state.selected_node_id()).unwrap();

    let module = add_child(&store, root, 2, json!({
        "title": "Module 1",
        "typeData": { "tydeType": "Module", "textContent": "This is the main module." },
    }));
    let stage = add_child(&store, module, 3, json!({
        "title": "Stage 1",
        "typeData": { "tydeType": "Stage" },
    }));
    let question_set = add_child(&store, stage, 4, json!({
        "title": "Question Set 1",
        "typeData": { "tydeType": "Question set" },
    }));

    let visitor = Caller::anonymous();
    store.read(|state| {
        assert_eq!(state.direct_children(root), vec![module]);
        assert_eq!(state.parent(question_set), Some(stage));
        assert!(state.has_path(root, question_set, &[]));
        for node in [root, module, stage, question_set] {
            assert!(state.is_visible(node, &visitor), "node {node} hidden");
        }
    });

    let exported = store.read(|state| state.tapestry_json());
    let value = serde_json::to_value(&exported).unwrap();
    assert_eq!(value["nodes"][3]["typeData"]["tydeType"], json!("Question set"));
    assert_eq!(value["links"], json!([
        { "source": 1, "target": 2 },
        { "source": 2, "target": 3 },
        { "source": 3, "target": 4 },
    ]));
}

#[test]
fn has_path_properties() {
    let store = load(json!({
        "nodes": [
            { "id": 1, "nodeType": "root" },
            { "id": 2, "nodeType": "child" },
            { "id": 3, "nodeType": "child" },
        ],
        "links": [{ "source": 1, "target": 2 }, { "source": 2, "target": 3 }],
    }));

    store.read(|state| {
        assert!(state.has_path(id(1), id(1), &[]));
        assert!(state.has_path(id(1), id(3), &[]));
        assert!(state.has_path(id(3), id(1), &[]));
        assert!(!state.has_path(id(1), id(3), &[Link::new(id(1), id(2))]));
    });
}

#[test]
fn deleting_a_link_reconciles_accordion_order() {
    let store = load(json!({
        "nodes": [
            { "id": 1, "nodeType": "root", "mediaType": "accordion" },
            { "id": 2, "nodeType": "child" },
            { "id": 3, "nodeType": "child" },
        ],
        "links": [{ "source": 1, "target": 2 }, { "source": 1, "target": 3 }],
    }));
    let ordering = |store: &Store| store.read(|s| s.node(id(1)).unwrap().child_ordering.clone());

    assert_eq!(ordering(&store), vec![id(2), id(3)]);
    store.commit(Mutation::UpdateOrdering { id: id(1), ord: vec![id(3), id(2)] }).unwrap();
    store.commit(Mutation::DeleteLink(1)).unwrap();
    store.commit(Mutation::InitializeOrdering(id(1))).unwrap();
    assert_eq!(ordering(&store), vec![id(2)]);

    store.commit(Mutation::InitializeOrdering(id(1))).unwrap();
    assert_eq!(ordering(&store), vec![id(2)]);
}

#[test]
fn submitted_draft_hand_off() {
    let author = UserId::new(11);
    let mut node = Node::template(&Settings::default());
    node.status = NodeStatus::Draft;
    node.review_status = Some(ReviewStatus::Submit);
    node.author = Some(tapestry_core::graph::Author::new(author));

    assert!(!has_permission(Some(&node), Action::Read, false, &Caller::user(author)));
    let reviewer = Caller::user(UserId::new(12)).tapestry_editor();
    assert!(has_permission(Some(&node), Action::Read, false, &reviewer));
}

#[test]
fn quiz_unlocks_dependent_node() {
    let store = load(json!({
        "rootId": 1,
        "nodes": [
            {
                "id": 1, "nodeType": "root",
                "quiz": [{ "id": "q1", "text": "Pick two" }],
            },
            {
                "id": 2, "nodeType": "child", "unlocked": false, "accessible": false,
                "conditions": [{ "type": "node_completed", "value": 1 }],
            },
        ],
        "links": [{ "source": 1, "target": 2 }],
    }));

    let entry = json!({ "checklistId": { "0": "a", "1": "", "2": "b" } });
    store
        .commit(Mutation::UpdateEntry {
            node_id: id(1),
            question_id: QuestionId::new("q1"),
            answer_type: AnswerType::Checklist,
            entry: entry.as_object().unwrap().clone(),
        })
        .unwrap();
    store
        .commit(Mutation::CompleteQuestion { node_id: id(1), question_id: QuestionId::new("q1") })
        .unwrap();
    store
        .commit(Mutation::FulfillNodeCondition {
            id: id(2),
            condition: Condition::new("node_completed", 1),
        })
        .unwrap();

    store.read(|state| {
        assert_eq!(
            state.entry("q1", AnswerType::Checklist),
            Some(FormattedEntry::Checklist(vec![json!("a"), json!("b")]))
        );
        let unlocked = state.node(id(2)).unwrap();
        assert!(unlocked.unlocked && unlocked.accessible);
    });

    // Export drops the learner's progress but keeps the question.
    let exported = store.read(|state| state.tapestry_json());
    let question = &exported.nodes[0].quiz[0];
    assert!(!question.completed && question.entries.is_none());
    assert_eq!(question.extra["text"], json!("Pick two"));
}

#[test]
fn subscribers_observe_committed_mutations() {
    let store = one_node();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = seen.clone();

    store.subscribe(move |mutation| {
        let json = serde_json::to_value(mutation).unwrap();
        seen_clone.lock().unwrap().push(json["type"].as_str().unwrap().to_string());
    });

    let commands: Vec<Mutation> = serde_json::from_value(json!([
        { "type": "select", "payload": 1 },
        { "type": "select", "payload": "1" },
        { "type": "deleteLink", "payload": 0 },
        { "type": "updateFavourites", "payload": { "favourites": [1] } },
    ]))
    .unwrap();
    let failures = commands
        .into_iter()
        .filter(|command| store.commit(command.clone()).is_err())
        .count();

    assert_eq!(failures, 1);
    assert_eq!(*seen.lock().unwrap(), ["select", "select", "updateFavourites"]);
    store.read(|state| {
        assert_eq!(state.selection(), [id(1)]);
        assert!(state.is_favourite(id(1)));
    });
}

#[test]
fn dataset_round_trips_through_json() {
    let raw = r#"{
        "rootId": "1",
        "nodes": [
            { "id": 1, "nodeType": "root", "imageURL": "a.png", "permissions": { "public": ["read"] } },
            { "id": "2", "nodeType": "child", "status": "draft", "author": { "id": "5", "name": "Sam" } }
        ],
        "links": [{ "source": { "id": 1 }, "target": 2 }],
        "groups": [],
        "settings": { "showRejected": true, "tapestrySlug": "intro" }
    }"#;
    let dataset = Dataset::from_json(raw).unwrap();
    let store = Store::from_dataset(dataset);

    let exported = store.read(|state| state.tapestry_json());
    let back: Value = serde_json::from_str(&exported.to_json().unwrap()).unwrap();
    assert_eq!(back["rootId"], json!(1));
    assert_eq!(back["nodes"][0]["imageURL"], json!("a.png"));
    assert_eq!(back["nodes"][1]["author"], json!({ "id": 5, "name": "Sam" }));
    assert_eq!(back["links"][0], json!({ "source": 1, "target": 2 }));
    assert_eq!(back["settings"]["tapestrySlug"], json!("intro"));
}

#[test]
fn pinned_coordinates_from_json() {
    let store = one_node();
    let commands: Vec<Mutation> = serde_json::from_value(json!([
        { "type": "updateNodeCoordinates", "payload": { "id": 1, "coordinates": { "fx": 10, "fy": 20 } } },
        { "type": "updateNodeCoordinates", "payload": { "id": 1, "coordinates": { "x": 10 } } },
    ]))
    .unwrap();
    for command in commands {
        store.commit(command).unwrap();
    }

    let exported = store.read(|state| state.tapestry_json());
    let root = serde_json::to_value(&exported.nodes[0]).unwrap();
    assert_eq!((root["fx"].clone(), root["fy"].clone()), (json!(10), json!(20)));
    assert_eq!(root["coordinates"], json!({ "x": 10.0, "y": 0.0 }));
}
