//! Tests for the coercion engine

use super::coerce::*;
use super::{Map, RegExp, Value};
use pretty_assertions::assert_eq;
use std::cmp::Ordering;

fn arr(items: &[f64]) -> Value {
    items.iter().copied().map(Value::from).collect()
}

#[test]
fn test_truthy() {
    for falsy in [
        Value::Null,
        Value::Undefined,
        Value::from(false),
        Value::from(0),
        Value::from(f64::NAN),
        Value::from(""),
    ] {
        assert!(!truthy(&falsy), "{falsy} should be falsy");
    }
    for truthy_value in [
        Value::from(true),
        Value::from(-1),
        Value::from("0"),
        Value::Array(vec![]),
        Value::Map(Map::new()),
        Value::RegExp(RegExp::new("x", "").unwrap()),
    ] {
        assert!(truthy(&truthy_value), "{truthy_value} should be truthy");
    }
}

#[test]
fn test_type_pair_string_dominates() {
    let s = Value::from("foo");
    assert_eq!(type_pair(&s, &Value::Map(Map::new())), TypePair::StringAny);
    assert_eq!(type_pair(&s, &arr(&[1.0])), TypePair::StringAny);
    assert_eq!(type_pair(&s, &Value::Null), TypePair::StringAny);
}

#[test]
fn test_type_pair_containers() {
    let a = arr(&[1.0]);
    let m = Value::Map(Map::new());
    assert_eq!(type_pair(&a, &a), TypePair::ArrayArray);
    assert_eq!(type_pair(&a, &m), TypePair::ArrayObject);
    assert_eq!(type_pair(&a, &Value::from(1)), TypePair::ArrayScalar);
    assert_eq!(type_pair(&a, &Value::from(true)), TypePair::ArrayScalar);
    assert_eq!(type_pair(&m, &a), TypePair::ObjectArray);
    assert_eq!(type_pair(&m, &m), TypePair::ObjectObject);
    assert_eq!(type_pair(&m, &Value::Null), TypePair::ObjectScalar);
    assert_eq!(type_pair(&Value::from(1), &a), TypePair::Default);
    assert_eq!(type_pair(&Value::from(1), &Value::from("1")), TypePair::Default);
    assert_eq!(TypePair::ObjectScalar.as_str(), "object:scalar");
}

#[test]
fn test_type_pair_string_right_of_container_is_default() {
    let s = Value::from("x");
    assert_eq!(type_pair(&arr(&[1.0]), &s), TypePair::Default);
    assert_eq!(type_pair(&Value::Map(Map::new()), &s), TypePair::Default);
}

#[test]
fn test_to_number() {
    assert_eq!(to_number(&Value::from("  42 ")), 42.0);
    assert_eq!(to_number(&Value::from("")), 0.0);
    assert_eq!(to_number(&Value::from("1e3")), 1000.0);
    assert_eq!(to_number(&Value::from("0x1F")), 31.0);
    assert_eq!(to_number(&Value::from("0b101")), 5.0);
    assert_eq!(to_number(&Value::from("-Infinity")), f64::NEG_INFINITY);
    assert!(to_number(&Value::from("12px")).is_nan());
    assert!(to_number(&Value::from("inf")).is_nan());
    assert_eq!(to_number(&Value::from("+5")), 5.0);
    assert_eq!(to_number(&Value::from("-5")), -5.0);
    assert!(to_number(&Value::from("-+5")).is_nan());
    assert!(to_number(&Value::from("--5")).is_nan());
    assert!(to_number(&Value::from("+-Infinity")).is_nan());
    assert_eq!(to_number(&Value::from(true)), 1.0);
    assert_eq!(to_number(&Value::Null), 0.0);
    assert!(to_number(&Value::Undefined).is_nan());
    assert_eq!(to_number(&arr(&[])), 0.0);
    assert_eq!(to_number(&arr(&[7.0])), 7.0);
    assert!(to_number(&arr(&[1.0, 2.0])).is_nan());
    assert!(to_number(&Value::Map(Map::new())).is_nan());
}

#[test]
fn test_stringify() {
    assert_eq!(stringify(&Value::from(3)), "3");
    assert_eq!(stringify(&Value::from(0.5)), "0.5");
    assert_eq!(stringify(&Value::from(-0.0)), "0");
    assert_eq!(stringify(&Value::from(f64::NAN)), "NaN");
    assert_eq!(stringify(&Value::from(f64::INFINITY)), "Infinity");
    assert_eq!(stringify(&Value::from(true)), "true");
    assert_eq!(stringify(&Value::Null), "");
    assert_eq!(stringify(&Value::Undefined), "");
    assert_eq!(stringify(&arr(&[1.0, 2.5])), "1,2.5");
    assert_eq!(stringify(&Value::map([("a", Value::from(1))])), "[object Object]");
    assert_eq!(
        stringify(&Value::RegExp(RegExp::new("a+", "i").unwrap())),
        "/a+/i"
    );
}

#[test]
fn test_format_number() {
    assert_eq!(format_number(42.0), "42");
    assert_eq!(format_number(-123.456), "-123.456");
    assert_eq!(format_number(0.000001), "0.000001");
    assert_eq!(format_number(1e-7), "1e-7");
    assert_eq!(format_number(-2.5e-9), "-2.5e-9");
    assert_eq!(format_number(1e20), "100000000000000000000");
    assert_eq!(format_number(1e21), "1e+21");
    assert_eq!(format_number(1.5e300), "1.5e+300");
    assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
}

#[test]
fn test_coerce_to_regexp() {
    let re = coerce(&Value::from("^a.c$"), Target::RegExp).unwrap();
    let Value::RegExp(re) = re else {
        panic!("expected regexp, got {re:?}");
    };
    assert!(re.is_match("abc"));
    assert_eq!(re.flags(), "");

    let original = RegExp::new("x", "i").unwrap();
    assert_eq!(
        coerce(&Value::RegExp(original.clone()), Target::RegExp).unwrap(),
        Value::RegExp(original)
    );
}

#[test]
fn test_coerce_to_regexp_fails_on_bad_pattern() {
    let err = coerce(&Value::from("(["), Target::RegExp).unwrap_err();
    assert!(err.to_string().contains("invalid regular expression"));
}

#[test]
fn test_coerce_to_array() {
    assert_eq!(coerce(&arr(&[1.0]), Target::Array).unwrap(), arr(&[1.0]));
    assert_eq!(
        coerce(
            &Value::map([("b", Value::from(1)), ("a", Value::from(0))]),
            Target::Array
        )
        .unwrap(),
        Value::Array(vec![Value::from("a"), Value::from("b")])
    );
    assert_eq!(
        coerce(&Value::from("x"), Target::Array).unwrap(),
        Value::Array(vec![Value::from("x")])
    );
}

#[test]
fn test_coerce_other_targets() {
    assert_eq!(
        coerce(&Value::from("2"), Target::Number).unwrap(),
        Value::from(2)
    );
    assert_eq!(
        coerce(&Value::from(2), Target::String).unwrap(),
        Value::from("2")
    );
    assert_eq!(
        coerce(&Value::from(""), Target::Boolean).unwrap(),
        Value::from(false)
    );
}

#[test]
fn test_to_int32() {
    assert_eq!(to_int32(5.9), 5);
    assert_eq!(to_int32(-5.9), -5);
    assert_eq!(to_int32(4_294_967_297.0), 1);
    assert_eq!(to_int32(2_147_483_648.0), i32::MIN);
    assert_eq!(to_int32(f64::NAN), 0);
    assert_eq!(to_int32(f64::INFINITY), 0);
}

#[test]
fn test_locale_compare() {
    assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
    assert_eq!(locale_compare("a", "A"), Ordering::Less);
    assert_eq!(locale_compare("A", "b"), Ordering::Less);
    assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    assert_eq!(locale_compare("ab", "a"), Ordering::Greater);
}
