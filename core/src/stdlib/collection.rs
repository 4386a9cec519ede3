//! Collection Functions
//!
//! Design notes:
//! - `count` never fails: scalars are counted by the characters of their
//!   string form
//! - `in` compares with strict equality, so `in([1], "1")` is false

use super::arg;
use crate::registry::FunctionRegistry;
use crate::values::coerce::stringify;
use crate::values::{FunctionError, Value};

pub fn register_collection_functions(registry: &mut FunctionRegistry) {
    registry.register_fn("count", |_, args| Ok(Value::from(count(&arg(args, 0)))));
    // `in(list, x)`; when `x` is omitted the call's receiver is tested.
    registry.register_fn("in", |this, args| {
        let needle = args.get(1).unwrap_or(this);
        contains(&arg(args, 0), needle).map(Value::Boolean)
    });
}

/// Elements of an array, keys of a map, characters of anything else.
pub fn count(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Map(map) => map.len(),
        Value::String(s) => s.chars().count(),
        other => stringify(other).chars().count(),
    }
}

pub fn contains(list: &Value, needle: &Value) -> Result<bool, FunctionError> {
    let Value::Array(items) = list else {
        return Err(FunctionError::InvalidArgument {
            function: "in".to_string(),
            expected: "array",
        });
    };
    Ok(items.iter().any(|item| item == needle))
}

#[cfg(test)]
#[path = "collection_test.rs"]
mod collection_test;
