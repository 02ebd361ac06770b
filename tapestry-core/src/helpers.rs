//! Helper Utilities
//!
//! Generic JSON and string helpers shared by the store and its host
//! bindings. Deep copies need no helper: every store type is `Clone`.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Recursively merge `other` into a copy of `source`.
///
/// Objects merge key by key. Arrays, scalars and `null` in `other` replace
/// whatever `source` held.
pub fn deep_merge(source: &Value, other: &Value) -> Value {
    let Value::Object(other) = other else {
        return other.clone();
    };
    let mut out = match source {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    for (key, value) in other {
        let merged = match value {
            Value::Object(_) => deep_merge(out.get(key).unwrap_or(&Value::Null), value),
            _ => value.clone(),
        };
        out.insert(key.clone(), merged);
    }
    Value::Object(out)
}

/// Deep equality used to detect unsaved node edits.
///
/// Only properties of `src` are compared. A property missing from `other`
/// is tolerated when its value in `src` is blank (`false`, `0`, `""`,
/// `"0"` or `[]`). Keys in `ignore` are skipped at the top level.
pub fn node_equal(src: &Value, other: &Value, ignore: &[&str]) -> bool {
    match (src, other) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| node_equal(x, y, &[]))
        }
        (Value::Object(a), Value::Object(b)) => a
            .iter()
            .filter(|(key, _)| !ignore.contains(&key.as_str()))
            .all(|(key, value)| match b.get(key) {
                Some(theirs) => node_equal(value, theirs, &[]),
                None => is_blank(value),
            }),
        (a, b) => a == b,
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Shallow comparison: true if the objects differ in key set or in any
/// top-level value.
pub fn is_different(src: &Map<String, Value>, other: &Map<String, Value>) -> bool {
    if src.len() != other.len() {
        return true;
    }
    src.iter().any(|(key, value)| other.get(key) != Some(value))
}

/// Copy of `obj` without `keys`.
pub fn omit(obj: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    obj.iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Keep the first item for every distinct key, preserving order.
pub fn unique_by<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Random (v4) UUID in its hyphenated form.
pub fn create_uuid() -> String {
    Uuid::new_v4().to_string()
}

pub fn only_contains_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Give protocol-relative URLs an https scheme.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http:") || url.starts_with("https:") {
        url.to_string()
    } else {
        format!("https:{url}")
    }
}

/// Replace decimal HTML character references (`&#39;`) with their characters.
///
/// References that do not name a valid character are left as they are.
pub fn decode_html_chars(s: &str) -> String {
    static CHAR_REF: OnceLock<Regex> = OnceLock::new();
    let char_ref = CHAR_REF.get_or_init(|| Regex::new(r"&#([0-9]+);").expect("static pattern"));

    char_ref
        .replace_all(s, |caps: &Captures<'_>| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

/// Resolve a bundled image path against the plugin's asset root.
///
/// Bundled paths contain a `dist` segment; the part after it is relative to
/// `asset_root`.
pub fn image_path(asset_root: &str, image: &str) -> Option<String> {
    let relative = image.split("dist").nth(1)?;
    Some(format!("{asset_root}/{relative}"))
}

/// Extract the video id from a YouTube watch, embed or short link.
///
/// The first link in `url` wins; ids are 6 to 11 characters long.
pub fn youtube_id(url: &str) -> Option<String> {
    static YOUTUBE_LINK: OnceLock<Regex> = OnceLock::new();
    let youtube_link = YOUTUBE_LINK.get_or_init(|| {
        Regex::new(
            r"(?:youtube\.com/\S*(?:(?:e(?:mbed))?/|watch\?(?:\S*?&?v=))|youtu\.be/)([a-zA-Z0-9_-]{6,11})",
        )
        .expect("static pattern")
    });

    youtube_link
        .captures(url)
        .map(|caps| caps[1].to_string())
}
