//! Tapestry Settings
//!
//! Settings travel with the dataset. The store interprets a handful of them
//! and passes the rest back on export.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::Permissions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Let reviewers see drafts whose review was rejected.
    #[serde(default)]
    pub show_rejected: bool,

    /// Node positions are computed by the layout engine rather than pinned.
    #[serde(default)]
    pub auto_layout: bool,

    /// Permissions given to newly created nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_permissions: Option<Permissions>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Settings {
    /// Node fields holding the horizontal and vertical position.
    ///
    /// Under auto-layout the engine owns `x`/`y`; otherwise positions are
    /// pinned through `fx`/`fy`.
    pub fn axis_keys(&self) -> (&'static str, &'static str) {
        if self.auto_layout {
            ("x", "y")
        } else {
            ("fx", "fy")
        }
    }

    /// Coordinates payload placing a node at (`x`, `y`) under this layout mode.
    pub fn position(&self, x: f64, y: f64) -> Map<String, Value> {
        let (x_key, y_key) = self.axis_keys();
        let mut coordinates = Map::new();
        coordinates.insert(x_key.to_string(), x.into());
        coordinates.insert(y_key.to_string(), y.into());
        coordinates
    }
}
