use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

use crate::dom::PropertyTarget;

/// Merge a property-tree onto `target`.
///
/// Recursion is driven by the target's shape, not the tree's: an object-like
/// value only merges into an existing object-like property. Anything else is
/// assigned wholesale, replacing whatever was there.
pub fn apply_properties(target: &mut dyn PropertyTarget, properties: &Value) {
    for (key, value) in entries(properties) {
        if is_object_like(value) {
            if let Some(nested) = target.nested_mut(&key) {
                apply_properties(nested, value);
                continue;
            }
        }
        target.set_property(&key, value.clone());
    }
}

/// Key/value pairs of an object, or index/value pairs of an array.
/// Scalars and `null` have none.
pub fn entries(value: &Value) -> Vec<(Cow<'_, str>, &Value)> {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
            .collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (Cow::Owned(i.to_string()), v))
            .collect(),
        other => {
            debug!(kind = value_kind(other), "property tree has no entries");
            Vec::new()
        }
    }
}

pub fn is_object_like(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn target(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_tree_is_a_noop() {
        let mut t = target(json!({ "a": 1 }));
        apply_properties(&mut t, &json!({}));
        assert_eq!(Value::Object(t), json!({ "a": 1 }));
    }

    #[test]
    fn merges_into_existing_object_without_clobbering_siblings() {
        let mut t = target(json!({ "a": { "b": 0, "c": 2 } }));
        apply_properties(&mut t, &json!({ "a": { "b": 1 } }));
        assert_eq!(Value::Object(t), json!({ "a": { "b": 1, "c": 2 } }));
    }

    #[test]
    fn replaces_non_object_property_wholesale() {
        let mut t = target(json!({ "a": "text" }));
        apply_properties(&mut t, &json!({ "a": { "b": 1 } }));
        assert_eq!(Value::Object(t), json!({ "a": { "b": 1 } }));
    }

    #[test]
    fn missing_key_gets_the_literal_object() {
        let mut t = target(json!({}));
        apply_properties(&mut t, &json!({ "style": { "color": "red" } }));
        assert_eq!(Value::Object(t), json!({ "style": { "color": "red" } }));
    }

    #[test]
    fn scalar_overwrites_existing_object() {
        let mut t = target(json!({ "style": { "color": "red" } }));
        apply_properties(&mut t, &json!({ "style": "color: blue" }));
        assert_eq!(Value::Object(t), json!({ "style": "color: blue" }));
    }

    #[test]
    fn null_target_property_is_not_recursed_into() {
        let mut t = target(json!({ "dataset": null }));
        apply_properties(&mut t, &json!({ "dataset": { "id": "7" } }));
        assert_eq!(Value::Object(t), json!({ "dataset": { "id": "7" } }));
    }

    #[test]
    fn deep_paths_merge_level_by_level() {
        let mut t = target(json!({ "a": { "b": { "c": 1, "d": 2 }, "e": 3 } }));
        apply_properties(&mut t, &json!({ "a": { "b": { "c": 9 } } }));
        assert_eq!(
            Value::Object(t),
            json!({ "a": { "b": { "c": 9, "d": 2 }, "e": 3 } })
        );
    }

    #[test]
    fn array_tree_merges_by_index() {
        let mut t = target(json!({ "classList": ["a", "b"] }));
        apply_properties(&mut t, &json!({ "classList": ["x"] }));
        assert_eq!(Value::Object(t), json!({ "classList": ["x", "b"] }));
    }

    #[test]
    fn scalar_tree_has_no_entries() {
        let mut t = target(json!({ "a": 1 }));
        apply_properties(&mut t, &json!("oops"));
        apply_properties(&mut t, &Value::Null);
        assert_eq!(Value::Object(t), json!({ "a": 1 }));
    }
}
