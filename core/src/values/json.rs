//! Conversion of JSON documents into runtime values, so hosts can feed
//! `serde_json` data directly as `vars` or `state`.

use crate::values::dynamic::{Map, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Map(
                fields
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Converts a JSON object into a variable bag. Non-object documents
/// produce an empty bag.
pub fn bag_from_json(json: serde_json::Value) -> Map {
    match Value::from(json) {
        Value::Map(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_nested_document() {
        let value = Value::from(json!({"a": [1, "x", null], "b": {"c": true}}));
        assert_eq!(
            value,
            Value::map([
                (
                    "a",
                    Value::Array(vec![Value::from(1), Value::from("x"), Value::Null])
                ),
                ("b", Value::map([("c", Value::from(true))])),
            ])
        );
    }

    #[test]
    fn test_bag_from_non_object_is_empty() {
        assert!(bag_from_json(json!([1, 2])).is_empty());
        assert_eq!(bag_from_json(json!({"k": 1})).len(), 1);
    }
}
