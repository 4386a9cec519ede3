//! Operator semantics, selected by the operands' [`TypePair`].
//!
//! Container operators never mutate their operands: they build new arrays
//! and maps.
//!
//! Equality and ordering are only reachable through the evaluator, which
//! handles `=~` and `!~` itself:
//!
//! ```compile_fail
//! use ael_core::evaluator::operators::relational;
//! ```

use crate::parser::{ArithmeticOp, BitwiseOp, RelationalOp, UnaryOp};
use crate::values::coerce::{
    TypePair, locale_compare, stringify, to_array, to_int32, to_number, truthy, type_pair,
};
use crate::values::{Map, Value};

use std::cmp::Ordering;

/// Element comparison used by set operations.
#[derive(Clone, Copy)]
enum Membership {
    /// Strict value equality.
    Strict,
    /// Equality of string forms, used when map keys meet array elements.
    Keyed,
}

impl Membership {
    fn same(self, a: &Value, b: &Value) -> bool {
        match self {
            Membership::Strict => a == b,
            Membership::Keyed => stringify(a) == stringify(b),
        }
    }

    fn contains(self, haystack: &[Value], needle: &Value) -> bool {
        haystack.iter().any(|item| self.same(item, needle))
    }

    fn is_subset(self, left: &[Value], right: &[Value]) -> bool {
        left.iter().all(|item| self.contains(right, item))
    }
}

fn map_value_truthy(map: &Map, key: &Value) -> bool {
    map.get(&stringify(key)).is_some_and(truthy)
}

fn keyed_true<'v>(items: impl IntoIterator<Item = &'v Value>) -> impl Iterator<Item = (String, Value)> {
    items
        .into_iter()
        .map(|item| (stringify(item), Value::Boolean(true)))
}

pub fn arithmetic(op: ArithmeticOp, left: &Value, right: &Value) -> Value {
    match op {
        ArithmeticOp::Add => add(left, right),
        ArithmeticOp::Sub => subtract(left, right),
        ArithmeticOp::Div => divide(left, right),
        ArithmeticOp::Mul => Value::Number(to_number(left) * to_number(right)),
        ArithmeticOp::Rem => Value::Number(to_number(left) % to_number(right)),
        ArithmeticOp::Pow => Value::Number(power(to_number(left), to_number(right))),
    }
}

fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        f64::NAN
    } else {
        base.powf(exponent)
    }
}

fn add(left: &Value, right: &Value) -> Value {
    match (type_pair(left, right), left, right) {
        (TypePair::StringAny, _, _) => Value::String(stringify(left) + &stringify(right)),
        (TypePair::ArrayArray, Value::Array(l), Value::Array(r)) => {
            Value::Array(l.iter().chain(r).cloned().collect())
        }
        (TypePair::ArrayObject, Value::Array(l), Value::Map(r)) => Value::Array(
            l.iter()
                .cloned()
                .chain(
                    r.iter()
                        .filter(|(_, v)| truthy(v))
                        .map(|(k, _)| Value::String(k.clone())),
                )
                .collect(),
        ),
        (TypePair::ArrayScalar, Value::Array(l), _) => {
            Value::Array(l.iter().chain([right]).cloned().collect())
        }
        (TypePair::ObjectArray, Value::Map(l), Value::Array(r)) => {
            let mut merged = l.clone();
            merged.extend(keyed_true(r));
            Value::Map(merged)
        }
        (TypePair::ObjectObject, Value::Map(l), Value::Map(r)) => {
            let mut merged = l.clone();
            merged.extend(r.iter().map(|(k, v)| (k.clone(), v.clone())));
            Value::Map(merged)
        }
        (TypePair::ObjectScalar, Value::Map(l), _) => {
            let mut merged = l.clone();
            merged.extend(keyed_true([right]));
            Value::Map(merged)
        }
        _ => Value::Number(to_number(left) + to_number(right)),
    }
}

fn subtract(left: &Value, right: &Value) -> Value {
    match (type_pair(left, right), left, right) {
        (TypePair::StringAny, _, _) => {
            Value::String(stringify(left).replacen(&stringify(right), "", 1))
        }
        (TypePair::ArrayArray, Value::Array(l), Value::Array(r)) => Value::Array(
            l.iter()
                .filter(|item| !Membership::Strict.contains(r, item))
                .cloned()
                .collect(),
        ),
        (TypePair::ArrayObject, Value::Array(l), Value::Map(r)) => Value::Array(
            l.iter()
                .filter(|item| !map_value_truthy(r, item))
                .cloned()
                .collect(),
        ),
        (TypePair::ArrayScalar, Value::Array(l), _) => {
            Value::Array(l.iter().filter(|item| *item != right).cloned().collect())
        }
        (TypePair::ObjectArray, Value::Map(l), Value::Array(r)) => Value::Map(
            l.iter()
                .filter(|(k, _)| !r.iter().any(|item| stringify(item) == **k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        (TypePair::ObjectObject, Value::Map(l), Value::Map(r)) => Value::Map(
            l.iter()
                .filter(|(k, _)| !r.get(*k).is_some_and(truthy))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        (TypePair::ObjectScalar, Value::Map(l), _) => {
            let key = stringify(right);
            Value::Map(
                l.iter()
                    .filter(|(k, _)| **k != key)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )
        }
        _ => Value::Number(to_number(left) - to_number(right)),
    }
}

fn divide(left: &Value, right: &Value) -> Value {
    match (type_pair(left, right), left, right) {
        (TypePair::StringAny, _, _) => {
            let (haystack, needle) = (stringify(left), stringify(right));
            if haystack.contains(&needle) {
                Value::String(needle)
            } else {
                Value::String(String::new())
            }
        }
        (TypePair::ArrayArray, Value::Array(l), Value::Array(r)) => Value::Array(
            l.iter()
                .filter(|item| Membership::Strict.contains(r, item))
                .cloned()
                .collect(),
        ),
        (TypePair::ArrayObject, Value::Array(l), Value::Map(r)) => Value::Array(
            l.iter()
                .filter(|item| map_value_truthy(r, item))
                .cloned()
                .collect(),
        ),
        (TypePair::ArrayScalar, Value::Array(l), _) => {
            Value::Array(l.iter().filter(|item| *item == right).cloned().collect())
        }
        (TypePair::ObjectArray, Value::Map(l), Value::Array(r)) => Value::Map(
            l.iter()
                .filter(|(k, _)| r.iter().any(|item| stringify(item) == **k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        (TypePair::ObjectObject, Value::Map(l), Value::Map(r)) => Value::Map(
            l.iter()
                .filter(|(k, _)| r.get(*k).is_some_and(truthy))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        ),
        (TypePair::ObjectScalar, Value::Map(l), _) => {
            let key = stringify(right);
            Value::Map(
                l.iter()
                    .filter(|(k, _)| **k == key)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            )
        }
        _ => Value::Number(to_number(left) / to_number(right)),
    }
}

/// Relational operators other than the regex matches, which need access to
/// the evaluation state.
pub(crate) fn relational(op: RelationalOp, left: &Value, right: &Value) -> bool {
    match op {
        RelationalOp::Eq => equals(left, right),
        RelationalOp::Neq => !equals(left, right),
        RelationalOp::Le | RelationalOp::Lt | RelationalOp::Ge | RelationalOp::Gt => {
            compare(op, left, right)
        }
        RelationalOp::Match | RelationalOp::NoMatch => {
            unreachable!("regex matching is handled by the evaluator")
        }
    }
}

fn set_equal(membership: Membership, left: &[Value], right: &[Value]) -> bool {
    membership.is_subset(left, right) && membership.is_subset(right, left)
}

fn equals(left: &Value, right: &Value) -> bool {
    match type_pair(left, right) {
        TypePair::ArrayArray => set_equal(
            Membership::Strict,
            &to_array(left),
            &to_array(right),
        ),
        TypePair::ArrayObject | TypePair::ObjectArray | TypePair::ObjectObject => set_equal(
            Membership::Keyed,
            &to_array(left),
            &to_array(right),
        ),
        TypePair::StringAny
        | TypePair::ArrayScalar
        | TypePair::ObjectScalar
        | TypePair::Default => left == right,
    }
}

fn compare(op: RelationalOp, left: &Value, right: &Value) -> bool {
    let pair = type_pair(left, right);
    match pair {
        TypePair::StringAny => {
            let ordering = locale_compare(&stringify(left), &stringify(right));
            match op {
                RelationalOp::Le => ordering != Ordering::Greater,
                RelationalOp::Lt => ordering == Ordering::Less,
                RelationalOp::Ge => ordering != Ordering::Less,
                _ => ordering == Ordering::Greater,
            }
        }
        TypePair::ArrayArray
        | TypePair::ArrayObject
        | TypePair::ObjectArray
        | TypePair::ObjectObject => {
            let membership = if pair == TypePair::ArrayArray {
                Membership::Strict
            } else {
                Membership::Keyed
            };
            let (l, r) = (to_array(left), to_array(right));
            let subset = membership.is_subset(&l, &r);
            let superset = membership.is_subset(&r, &l);
            match op {
                RelationalOp::Le => subset,
                RelationalOp::Lt => subset && !superset,
                RelationalOp::Ge => superset,
                _ => superset && !subset,
            }
        }
        TypePair::ArrayScalar | TypePair::ObjectScalar | TypePair::Default => {
            let (l, r) = (to_number(left), to_number(right));
            match op {
                RelationalOp::Le => l <= r,
                RelationalOp::Lt => l < r,
                RelationalOp::Ge => l >= r,
                _ => l > r,
            }
        }
    }
}

pub fn bitwise(op: BitwiseOp, left: &Value, right: &Value) -> Value {
    let (l, r) = (to_int32(to_number(left)), to_int32(to_number(right)));
    let shift = (r as u32) & 31;
    let result = match op {
        BitwiseOp::And => l & r,
        BitwiseOp::Or => l | r,
        BitwiseOp::Shl => l.wrapping_shl(shift),
        BitwiseOp::Shr => l >> shift,
    };
    Value::Number(f64::from(result))
}

pub fn unary(op: UnaryOp, operand: &Value) -> Value {
    match op {
        UnaryOp::Not => Value::Boolean(!truthy(operand)),
        UnaryOp::BitNot => Value::Number(f64::from(!to_int32(to_number(operand)))),
    }
}

#[cfg(test)]
#[path = "operators_test.rs"]
mod operators_test;
