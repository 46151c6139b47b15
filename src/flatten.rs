//! Flattening of nested JSON payloads
//!
//! Nested objects collapse into a single level whose keys join the path with
//! [`SEPARATOR`]. Arrays and scalars are kept as opaque leaf values.
//!
//! Key collisions are possible when upstream keys already contain the
//! separator (`{"a_b": 1, "a": {"b": 2}}`). The pair visited last wins;
//! visiting follows the order of the source object, which for
//! `serde_json::Map` is ascending key order.

use crate::logging::get_logger;
use serde_json::{Map, Value};

/// Single-level mapping from joined key path to leaf value
pub type FlatMap = Map<String, Value>;

/// Separator placed between parent and child keys
pub const SEPARATOR: char = '_';

const PREVIEW_CHARS: usize = 50;

/// Flatten `nested` into a single-level map.
///
/// A non-object top level (string, array, null, ...) is logged and yields an
/// empty map instead of an error.
pub fn flatten(nested: &Value) -> FlatMap {
    let mut out = FlatMap::new();
    match nested {
        Value::Object(map) => flatten_into(map, None, &mut out),
        other => {
            get_logger("flatten").warn(&format!(
                "Expected object but got {}. Data preview: {}...",
                type_name(other),
                preview(other)
            ));
        }
    }
    out
}

fn flatten_into(map: &Map<String, Value>, parent: Option<&str>, out: &mut FlatMap) {
    for (key, value) in map {
        let joined = match parent {
            Some(parent) => format!("{}{}{}", parent, SEPARATOR, key),
            None => key.clone(),
        };
        match value {
            Value::Object(child) => flatten_into(child, Some(&joined), out),
            leaf => {
                out.insert(joined, leaf.clone());
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn preview(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::String(s) if s.is_empty() => "None".to_string(),
        Value::String(s) => s.chars().take(PREVIEW_CHARS).collect(),
        other => other.to_string().chars().take(PREVIEW_CHARS).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_nested_objects() {
        let flat = flatten(&json!({"a": {"b": 1, "c": {"d": 2}}}));
        assert_eq!(Value::Object(flat), json!({"a_b": 1, "a_c_d": 2}));
    }

    #[test]
    fn arrays_stay_opaque() {
        let flat = flatten(&json!({"meters": [1, 2, {"x": 3}]}));
        assert_eq!(flat.get("meters"), Some(&json!([1, 2, {"x": 3}])));
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn empty_child_object_emits_nothing() {
        let flat = flatten(&json!({"a": {}, "b": null}));
        assert!(!flat.contains_key("a"));
        assert_eq!(flat.get("b"), Some(&Value::Null));
    }

    #[test]
    fn non_object_top_level_is_empty() {
        assert!(flatten(&json!("unexpected body")).is_empty());
        assert!(flatten(&Value::Null).is_empty());
        assert!(flatten(&json!([1, 2, 3])).is_empty());
        assert!(flatten(&json!(42)).is_empty());
    }

    #[test]
    fn collision_last_visited_wins() {
        // "a" sorts before "a_b", so the literal key is visited last
        let flat = flatten(&json!({"a": {"b": 1}, "a_b": 2}));
        assert_eq!(flat.get("a_b"), Some(&json!(2)));
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn preview_is_truncated() {
        let long = "x".repeat(200);
        assert_eq!(preview(&Value::String(long)).len(), PREVIEW_CHARS);
        assert_eq!(preview(&Value::Null), "None");
    }
}
