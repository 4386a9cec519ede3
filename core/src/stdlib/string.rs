//! String Functions
//!
//! Design notes:
//! - Every function works on the string form of its first argument, so
//!   `uc(42)` is `"42"`
//! - Positions and lengths count characters (Unicode scalar values), not
//!   bytes
//! - Case mapping is full Unicode

use super::{arg, integer_arg};
use crate::registry::FunctionRegistry;
use crate::values::Value;
use crate::values::coerce::stringify;

pub fn register_string_functions(registry: &mut FunctionRegistry) {
    registry.register_fn("substr", |_, args| {
        Ok(Value::String(substr(
            &stringify(&arg(args, 0)),
            integer_arg(args, 1),
            integer_arg(args, 2),
        )))
    });
    registry.register_fn("index", |_, args| {
        let found = index(
            &stringify(&arg(args, 0)),
            &stringify(&arg(args, 1)),
            integer_arg(args, 2),
        );
        Ok(Value::Number(found.map_or(-1.0, |i| i as f64)))
    });
    registry.register_fn("trim", |_, args| {
        Ok(Value::from(stringify(&arg(args, 0)).trim()))
    });
    registry.register_fn("lc", |_, args| {
        Ok(Value::String(stringify(&arg(args, 0)).to_lowercase()))
    });
    registry.register_fn("uc", |_, args| {
        Ok(Value::String(stringify(&arg(args, 0)).to_uppercase()))
    });
}

// ========================================================================
// Extraction
// ========================================================================

/// `len` characters starting at `pos`. A negative `pos` counts from the
/// end; a missing `len` runs to the end of the string.
pub fn substr(text: &str, pos: Option<f64>, len: Option<f64>) -> String {
    let size = text.chars().count() as f64;
    let pos = pos.unwrap_or(0.0);
    let start = if pos < 0.0 {
        (size + pos).max(0.0)
    } else {
        pos.min(size)
    };
    let end = match len {
        Some(len) => (start + len.max(0.0)).min(size),
        None => size,
    };
    if start >= end {
        return String::new();
    }
    text.chars()
        .skip(start as usize)
        .take((end - start) as usize)
        .collect()
}

// ========================================================================
// Search
// ========================================================================

/// Character index of the first occurrence of `needle` at or after `from`.
pub fn index(text: &str, needle: &str, from: Option<f64>) -> Option<usize> {
    let size = text.chars().count();
    let from = from.unwrap_or(0.0).clamp(0.0, size as f64) as usize;
    let offset = text
        .char_indices()
        .nth(from)
        .map_or(text.len(), |(byte, _)| byte);
    text[offset..]
        .find(needle)
        .map(|byte| from + text[offset..offset + byte].chars().count())
}

#[cfg(test)]
#[path = "string_test.rs"]
mod string_test;
