//! # Configuration
//!
//! The resource schema arrives as a nested tree, the way it would come out of a
//! YAML settings file:
//!
//! ```yaml
//! apis:
//!   default:
//!     commonConfiguration:
//!       linkNamespace: acme
//!     resources:
//!       user:
//!         className: User
//!         properties:
//!           name: {}
//! ```
//!
//! The tree is kept as a [`serde_json::Value`] (with `preserve_order`, so
//! declaration order of links and properties survives). [`merge_overrule`]
//! implements the layering used everywhere in the crate.

mod settings;

pub use settings::*;

use serde_json::{Map, Value};

/// An ordered configuration map.
pub type Options = Map<String, Value>;

/// Recursively merges `overrule` on top of `base`.
///
/// Maps merge key by key; any other value in `overrule` replaces the one in
/// `base` wholesale (lists are not concatenated).
pub fn merge_overrule(base: &Options, overrule: &Options) -> Options {
    let mut merged = base.clone();
    for (key, value) in overrule {
        let next = match (merged.get(key), value) {
            (Some(Value::Object(left)), Value::Object(right)) => {
                Value::Object(merge_overrule(left, right))
            }
            _ => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

/// Reads a list of strings, ignoring non-string entries.
///
/// A single string is accepted as a one-element list.
pub fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

/// Reads a scalar as a string (numbers and booleans are formatted).
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// PHP-style truthiness for flags like `absolute` or `templated`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> Options {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_override_wins_and_base_fields_survive() {
        let base = options(json!({"x": 2, "y": 3}));
        let local = options(json!({"x": 1}));
        let merged = merge_overrule(&base, &local);
        assert_eq!(Value::Object(merged), json!({"x": 1, "y": 3}));
    }

    #[test]
    fn test_nested_maps_merge_key_by_key() {
        let base = options(json!({"routeValues": {"@action": "show", "@controller": "User"}}));
        let local = options(json!({"routeValues": {"@action": "index"}}));
        let merged = merge_overrule(&base, &local);
        assert_eq!(
            Value::Object(merged),
            json!({"routeValues": {"@action": "index", "@controller": "User"}})
        );
    }

    #[test]
    fn test_lists_are_replaced_not_concatenated() {
        let base = options(json!({"excludeProperties": ["a", "b"]}));
        let local = options(json!({"excludeProperties": ["c"]}));
        let merged = merge_overrule(&base, &local);
        assert_eq!(merged["excludeProperties"], json!(["c"]));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!(null)));
    }
}
