//! Quiz views: activities, questions and recorded answers.

use serde_json::{Map, Value};

use crate::graph::{parse_int_prefix, AnswerType, FormattedEntry, NodeId, Question, TapestryState};
use crate::helpers::only_contains_digits;

const AUDIO_DATA_URI: &str = "data:audio/ogg; codecs=opus;base64,";

impl TapestryState {
    /// Every quiz question in the map, skipping nodes in `exclude`.
    pub fn activities(&self, exclude: &[NodeId]) -> Vec<&Question> {
        self.nodes
            .values()
            .filter(|node| !exclude.contains(&node.id))
            .flat_map(|node| node.quiz.iter())
            .collect()
    }

    /// Find a question by id across all nodes.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.nodes.values().find_map(|node| node.question(id))
    }

    /// The answer recorded for `question_id`, formatted for display.
    ///
    /// Returns `None` when the question is unknown or nothing has been
    /// recorded under `answer_type`.
    pub fn entry(&self, question_id: &str, answer_type: AnswerType) -> Option<FormattedEntry> {
        let raw = self.question(question_id)?.entry(answer_type)?;
        if is_falsy(raw) {
            return None;
        }
        Some(format_entry(raw, answer_type))
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn format_entry(raw: &Value, answer_type: AnswerType) -> FormattedEntry {
    match answer_type {
        AnswerType::Audio => {
            let data = match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            FormattedEntry::Audio(format!("{AUDIO_DATA_URI}{data}"))
        }
        AnswerType::Text => FormattedEntry::Text(answers(raw).into_iter().next()),
        AnswerType::Checklist => FormattedEntry::Checklist(
            answers(raw)
                .into_iter()
                .filter(|answer| answer.as_str() != Some(""))
                .collect(),
        ),
    }
}

/// Answers held by a raw entry.
///
/// Entries are objects whose numerically keyed properties are the answers;
/// other properties are metadata. Index-like keys come first in numeric
/// order, then the remaining numeric-prefixed keys in insertion order.
fn answers(raw: &Value) -> Vec<Value> {
    match raw {
        Value::Object(map) => numbered_values(map),
        Value::Array(items) => items.clone(),
        scalar => vec![scalar.clone()],
    }
}

fn numbered_values(map: &Map<String, Value>) -> Vec<Value> {
    let mut numbered: Vec<(Option<u64>, &Value)> = map
        .iter()
        .filter(|(key, _)| is_answer_key(key))
        .map(|(key, value)| (array_index(key), value))
        .collect();
    numbered.sort_by_key(|(index, _)| match index {
        Some(index) => (0, *index),
        None => (1, 0),
    });
    numbered.into_iter().map(|(_, value)| value.clone()).collect()
}

/// Keys that start with an optionally signed integer hold answers.
fn is_answer_key(key: &str) -> bool {
    let trimmed = key.trim_start();
    match trimmed.strip_prefix('-') {
        Some(unsigned) => unsigned.starts_with(|c: char| c.is_ascii_digit()),
        None => parse_int_prefix(trimmed).is_some(),
    }
}

fn array_index(key: &str) -> Option<u64> {
    let canonical = only_contains_digits(key) && (key == "0" || !key.starts_with('0'));
    canonical.then(|| key.parse().ok()).flatten()
}
