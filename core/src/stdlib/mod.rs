//! AEL Standard Library
//!
//! Host functions pre-registered in every [`Engine`](crate::api::Engine):
//! - Collection: `count`, `in`
//! - String: `substr`, `index`, `trim`, `lc`, `uc`
//!
//! Arguments are coerced the way the operators coerce them: missing
//! arguments read as `undefined`, strings are taken from the argument's
//! string form.

use crate::registry::FunctionRegistry;
use crate::values::Value;
use crate::values::coerce::to_number;

pub mod collection;
pub mod string;

pub use collection::register_collection_functions;
pub use string::register_string_functions;

/// Register all standard library functions.
pub fn register_stdlib(registry: &mut FunctionRegistry) {
    register_collection_functions(registry);
    register_string_functions(registry);
}

/// Argument `index`, or `undefined` when the call passed fewer arguments.
fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

/// Integer form of argument `index`: truncated toward zero, `NaN` read as
/// zero. `None` when the argument is missing or `undefined`.
fn integer_arg(args: &[Value], index: usize) -> Option<f64> {
    match args.get(index) {
        None | Some(Value::Undefined) => None,
        Some(value) => {
            let n = to_number(value);
            Some(if n.is_nan() { 0.0 } else { n.trunc() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_stdlib() {
        let mut registry = FunctionRegistry::new();
        register_stdlib(&mut registry);
        for name in ["count", "in", "substr", "index", "trim", "lc", "uc"] {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_integer_arg() {
        let args = [
            Value::from(2.9),
            Value::from(-2.9),
            Value::from("x"),
            Value::Undefined,
            Value::Null,
        ];
        assert_eq!(integer_arg(&args, 0), Some(2.0));
        assert_eq!(integer_arg(&args, 1), Some(-2.0));
        assert_eq!(integer_arg(&args, 2), Some(0.0));
        assert_eq!(integer_arg(&args, 3), None);
        assert_eq!(integer_arg(&args, 4), Some(0.0));
        assert_eq!(integer_arg(&args, 9), None);
        assert_eq!(arg(&args, 9), Value::Undefined);
    }
}
