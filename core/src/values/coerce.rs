//! Type classification and conversion rules shared by every operator.
//!
//! All conversions are total except compiling a regular expression from
//! a string that is not a valid pattern.

use crate::values::{
    dynamic::Value,
    regexp::{RegExp, RegExpError},
};

use std::borrow::Cow;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoercionError {
    #[error(transparent)]
    RegExp(#[from] RegExpError),
}

/// Coarse classification used to pick operator semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    String,
    Array,
    Object,
    /// Numbers, booleans, null, undefined, regexps and functions.
    Scalar,
}

/// Operand type combination selecting a column of the operator table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypePair {
    StringAny,
    ArrayArray,
    ArrayObject,
    ArrayScalar,
    ObjectArray,
    ObjectObject,
    ObjectScalar,
    /// Numeric semantics.
    Default,
}

impl TypePair {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypePair::StringAny => "string:any",
            TypePair::ArrayArray => "array:array",
            TypePair::ArrayObject => "array:object",
            TypePair::ArrayScalar => "array:scalar",
            TypePair::ObjectArray => "object:array",
            TypePair::ObjectObject => "object:object",
            TypePair::ObjectScalar => "object:scalar",
            TypePair::Default => "default",
        }
    }
}

/// Conversion targets understood by [`coerce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Number,
    String,
    Boolean,
    RegExp,
    Array,
}

pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Undefined => false,
        Value::Boolean(b) => *b,
        Value::Number(n) => !(*n == 0.0 || n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::RegExp(_) | Value::Array(_) | Value::Map(_) | Value::Function(_) => true,
    }
}

pub fn classify(value: &Value) -> Class {
    match value {
        Value::String(_) => Class::String,
        Value::Array(_) => Class::Array,
        Value::Map(_) => Class::Object,
        _ => Class::Scalar,
    }
}

/// String semantics dominate when the left operand is a string. A string
/// on the right of a container gets no container semantics.
pub fn type_pair(left: &Value, right: &Value) -> TypePair {
    match (classify(left), classify(right)) {
        (Class::String, _) => TypePair::StringAny,
        (_, Class::String) => TypePair::Default,
        (Class::Array, Class::Array) => TypePair::ArrayArray,
        (Class::Array, Class::Object) => TypePair::ArrayObject,
        (Class::Array, Class::Scalar) => TypePair::ArrayScalar,
        (Class::Object, Class::Array) => TypePair::ObjectArray,
        (Class::Object, Class::Object) => TypePair::ObjectObject,
        (Class::Object, Class::Scalar) => TypePair::ObjectScalar,
        (Class::Scalar, _) => TypePair::Default,
    }
}

pub fn coerce(value: &Value, target: Target) -> Result<Value, CoercionError> {
    Ok(match target {
        Target::Number => Value::Number(to_number(value)),
        Target::String => Value::String(stringify(value)),
        Target::Boolean => Value::Boolean(truthy(value)),
        Target::RegExp => Value::RegExp(to_regexp(value)?.into_owned()),
        Target::Array => Value::Array(to_array(value).into_owned()),
    })
}

pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Undefined => f64::NAN,
        Value::Boolean(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::String(s) => parse_number(s),
        // [] -> 0, [x] -> number of x's string form, otherwise NaN
        Value::Array(_) => parse_number(&stringify(value)),
        Value::RegExp(_) | Value::Map(_) | Value::Function(_) => f64::NAN,
    }
}

/// Language-level string conversion.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null | Value::Undefined => String::new(),
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::String(s) => s.clone(),
        Value::RegExp(re) => re.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        Value::Map(_) => "[object Object]".to_string(),
        Value::Function(func) => format!("[function {}]", func.name()),
    }
}

pub fn to_regexp(value: &Value) -> Result<Cow<'_, RegExp>, CoercionError> {
    match value {
        Value::RegExp(re) => Ok(Cow::Borrowed(re)),
        other => Ok(Cow::Owned(RegExp::new(&stringify(other), "")?)),
    }
}

/// Arrays pass through, maps become the array of their keys, anything
/// else a one-element array.
pub fn to_array(value: &Value) -> Cow<'_, [Value]> {
    match value {
        Value::Array(items) => Cow::Borrowed(items.as_slice()),
        Value::Map(map) => Cow::Owned(map.keys().map(|k| Value::String(k.clone())).collect()),
        other => Cow::Owned(vec![other.clone()]),
    }
}

/// Parses a numeric string the way the language does: surrounding
/// whitespace is ignored, the empty string is zero, and anything that is
/// not a complete number is NaN.
pub fn parse_number(text: &str) -> f64 {
    let s = text.trim();
    if s.is_empty() {
        return 0.0;
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = s.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .ok()
                .filter(|_| !digits.starts_with('+'))
                .map_or(f64::NAN, |n| n as f64);
        }
    }
    let (sign, body) = match s.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, s.strip_prefix('+').unwrap_or(s)),
    };
    if body.starts_with(['+', '-']) {
        return f64::NAN;
    }
    if body == "Infinity" {
        return sign * f64::INFINITY;
    }
    let well_formed = body
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !well_formed {
        return f64::NAN;
    }
    body.parse::<f64>().map_or(f64::NAN, |n| sign * n)
}

/// Shortest round-trip rendering in the ECMAScript `Number#toString`
/// layout: plain decimals for magnitudes in `[1e-6, 1e21)`, exponent
/// notation with an explicit sign outside it.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return s.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `1.5e300`
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let count = digits.len() as i32;
    // Position of the decimal point relative to the first digit
    let point = exponent + 1;

    let body = if (count..=21).contains(&point) {
        format!("{digits}{}", "0".repeat((point - count) as usize))
    } else if (1..=21).contains(&point) {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if (-5..=0).contains(&point) {
        format!("0.{}{digits}", "0".repeat(-point as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        let sign = if exponent < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{first}e{sign}{}", exponent.abs())
        } else {
            format!("{first}.{rest}e{sign}{}", exponent.abs())
        }
    };
    if n < 0.0 { format!("-{body}") } else { body }
}

/// Wraps a number into the signed 32-bit range (modular, truncating).
pub fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }
    n.trunc().rem_euclid(4_294_967_296.0) as u32 as i32
}

/// Collation used by the string ordering operators: letters compare
/// case-insensitively first, lowercase sorts before uppercase when the
/// strings differ only in case, and code point order breaks remaining
/// ties.
pub fn locale_compare(left: &str, right: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();
    folded(left)
        .cmp(&folded(right))
        .then_with(|| {
            left.chars()
                .map(char::is_uppercase)
                .cmp(right.chars().map(char::is_uppercase))
        })
        .then_with(|| left.cmp(right))
}
