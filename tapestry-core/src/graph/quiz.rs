//! Quiz Questions
//!
//! Nodes may carry a quiz: a list of questions, each with the raw answers a
//! learner recorded keyed by answer type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Identifier of a quiz question. Usually a UUID string, but numeric ids
/// from older datasets are accepted and kept in their decimal form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(text) => Self(text),
            Raw::Number(number) => Self(number.to_string()),
        })
    }
}

/// Kind of answer a learner can record for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerType {
    #[serde(rename = "textId")]
    Text,
    #[serde(rename = "checklistId")]
    Checklist,
    #[serde(rename = "audioId")]
    Audio,
}

impl AnswerType {
    /// Key under which entries of this type are stored.
    pub fn key(&self) -> &'static str {
        match self {
            AnswerType::Text => "textId",
            AnswerType::Checklist => "checklistId",
            AnswerType::Audio => "audioId",
        }
    }
}

impl FromStr for AnswerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "textId" => Ok(AnswerType::Text),
            "checklistId" => Ok(AnswerType::Checklist),
            "audioId" => Ok(AnswerType::Audio),
            other => Err(format!("unknown answer type: {other}")),
        }
    }
}

/// A quiz question attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,

    /// Raw recorded answers, keyed by answer type.
    #[serde(default)]
    pub entries: Option<Map<String, Value>>,

    #[serde(default)]
    pub completed: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Question {
    pub fn new(id: impl Into<QuestionId>) -> Self {
        Self {
            id: id.into(),
            entries: None,
            completed: false,
            extra: Map::new(),
        }
    }

    /// Raw entry recorded for `answer_type`, if any.
    pub fn entry(&self, answer_type: AnswerType) -> Option<&Value> {
        self.entries.as_ref()?.get(answer_type.key())
    }

    /// Copy of this question with session progress removed.
    pub fn without_progress(&self) -> Self {
        Self {
            entries: None,
            completed: false,
            ..self.clone()
        }
    }
}

/// A recorded answer prepared for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "entry", rename_all = "lowercase")]
pub enum FormattedEntry {
    /// First text answer.
    Text(Option<Value>),
    /// Every non-empty selected option.
    Checklist(Vec<Value>),
    /// Audio recording as a data URI.
    Audio(String),
}
