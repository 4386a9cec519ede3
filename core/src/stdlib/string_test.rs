//! Tests for the string functions

use super::*;
use crate::values::FunctionError;
use pretty_assertions::assert_eq;

// Helper calling a registered string function with plain arguments
fn call(name: &str, args: &[Value]) -> Result<Value, FunctionError> {
    let mut registry = FunctionRegistry::new();
    register_string_functions(&mut registry);
    registry
        .resolve(name)
        .expect("function should be registered")
        .call(&Value::Undefined, args)
}

#[test]
fn test_substr() {
    assert_eq!(substr("hello world", Some(6.0), Some(5.0)), "world");
    assert_eq!(substr("hello", Some(1.0), None), "ello");
    assert_eq!(substr("hello", None, Some(2.0)), "he");
    // Negative positions count from the end
    assert_eq!(substr("hello", Some(-3.0), Some(2.0)), "ll");
    assert_eq!(substr("hello", Some(-10.0), Some(2.0)), "he");
    // Out of range
    assert_eq!(substr("hello", Some(10.0), Some(2.0)), "");
    assert_eq!(substr("hello", Some(1.0), Some(-1.0)), "");
    assert_eq!(substr("hello", Some(3.0), Some(100.0)), "lo");
}

#[test]
fn test_substr_counts_characters() {
    assert_eq!(substr("café au lait", Some(3.0), Some(1.0)), "é");
    assert_eq!(substr("日本語", Some(-1.0), None), "語");
}

#[test]
fn test_index() {
    assert_eq!(index("hello", "l", None), Some(2));
    assert_eq!(index("hello", "l", Some(3.0)), Some(3));
    assert_eq!(index("hello", "z", None), None);
    assert_eq!(index("hello", "", Some(2.0)), Some(2));
    assert_eq!(index("hello", "", Some(99.0)), Some(5));
    assert_eq!(index("hello", "h", Some(-4.0)), Some(0));
    assert_eq!(index("naïve naïve", "ve", Some(4.0)), Some(9));
}

#[test]
fn test_registered_functions() {
    assert_eq!(
        call("substr", &[Value::from("abcdef"), Value::from(2), Value::from(3)]),
        Ok(Value::from("cde"))
    );
    assert_eq!(
        call("substr", &[Value::from(12345), Value::from("1")]),
        Ok(Value::from("2345"))
    );
    assert_eq!(
        call("index", &[Value::from("abcabc"), Value::from("c"), Value::from(3)]),
        Ok(Value::from(5))
    );
    assert_eq!(
        call("index", &[Value::from("abc"), Value::from("x")]),
        Ok(Value::from(-1))
    );
    assert_eq!(
        call("trim", &[Value::from("  padded\t\n")]),
        Ok(Value::from("padded"))
    );
    assert_eq!(call("lc", &[Value::from("MiXeD")]), Ok(Value::from("mixed")));
    assert_eq!(call("uc", &[Value::from("straße")]), Ok(Value::from("STRASSE")));
    assert_eq!(call("uc", &[Value::from(true)]), Ok(Value::from("TRUE")));
}

#[test]
fn test_missing_arguments() {
    assert_eq!(call("trim", &[]), Ok(Value::from("")));
    assert_eq!(call("lc", &[Value::Null]), Ok(Value::from("")));
    assert_eq!(
        call("substr", &[Value::from("abc"), Value::from(1), Value::Undefined]),
        Ok(Value::from("bc"))
    );
}
