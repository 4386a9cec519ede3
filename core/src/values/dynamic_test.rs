//! Tests for the dynamic value type

use super::{Map, RegExp, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_display_renders_literals() {
    let value = Value::map([
        ("list", Value::Array(vec![Value::from(1), Value::from("two")])),
        ("none", Value::Null),
        ("re", Value::RegExp(RegExp::new("^a$", "i").unwrap())),
    ]);
    assert_eq!(
        value.to_string(),
        r#"{"list":[1,"two"],"none":null,"re":/^a$/i}"#
    );
    assert_eq!(Value::Undefined.to_string(), "undefined");
    assert_eq!(Value::from("say \"hi\"").to_string(), r#""say \"hi\"""#);
    assert_eq!(
        Value::function("lc", |_, _| Ok(Value::Null)).to_string(),
        "[Function: lc]"
    );
}

#[test]
fn test_equality_is_structural() {
    let a = Value::map([("x", Value::Array(vec![Value::from(1)]))]);
    let b = Value::map([("x", Value::Array(vec![Value::from(1)]))]);
    assert_eq!(a, b);
    assert_ne!(Value::from(f64::NAN), Value::from(f64::NAN));
    assert_ne!(Value::from(1), Value::from("1"));
    assert_ne!(Value::Null, Value::Undefined);
}

#[test]
fn test_property_lookup() {
    let list = Value::Array(vec![Value::from("a"), Value::from("b")]);
    assert_eq!(list.property("1"), Some(Value::from("b")));
    assert_eq!(list.property("2"), None);
    assert_eq!(list.property("+1"), None);
    assert_eq!(list.property("length"), Some(Value::from(2)));

    let map = Value::map([("k", Value::from(true))]);
    assert_eq!(map.property("k"), Some(Value::from(true)));
    assert_eq!(map.property("missing"), None);

    assert_eq!(Value::from("str").property("length"), None);
}

#[test]
fn test_conversions() {
    assert_eq!(Value::from(Some("x")), Value::from("x"));
    assert_eq!(Value::from(None::<bool>), Value::Null);
    assert_eq!(Value::from(3usize), Value::Number(3.0));
    assert_eq!(Value::from(Map::new()), Value::Map(Map::new()));
    assert_eq!(
        vec![Value::from(1)].into_iter().collect::<Value>(),
        Value::Array(vec![Value::from(1)])
    );
}

#[test]
fn test_accessors() {
    assert_eq!(Value::from(2).as_number(), Some(2.0));
    assert_eq!(Value::from("s").as_str(), Some("s"));
    assert_eq!(Value::from(true).as_bool(), Some(true));
    assert_eq!(Value::Null.as_str(), None);
    assert!(Value::Undefined.is_nullish());
    assert!(!Value::from(0).is_nullish());
    assert_eq!(Value::Map(Map::new()).type_name(), "object");
}
