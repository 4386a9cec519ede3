//! Host function values.
//!
//! A [`Function`] wraps a native Rust closure. It is invoked with the
//! receiver the call was made through (`obj.method()` passes `obj`, bare
//! calls pass `Undefined`) and the evaluated arguments.

use crate::values::dynamic::Value;

use std::fmt;
use std::sync::Arc;

/// Signature of native functions callable from expressions.
pub type NativeFn = dyn Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync;

/// Failure reported by a host function. Aborts the evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FunctionError {
    #[error("invalid argument to function \"{function}\" ({expected} expected)")]
    InvalidArgument {
        function: String,
        expected: &'static str,
    },
    #[error("{0}")]
    Failed(String),
}

impl FunctionError {
    pub fn failed(message: impl Into<String>) -> Self {
        FunctionError::Failed(message.into())
    }
}

/// A named, shareable native function.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    func: Arc<NativeFn>,
}

impl Function {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the function with `this` as receiver.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, FunctionError> {
        (self.func)(this, args)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_passes_receiver_and_args() {
        let func = Function::new("first", |this, args| {
            Ok(args.first().cloned().unwrap_or_else(|| this.clone()))
        });
        assert_eq!(func.name(), "first");
        assert_eq!(
            func.call(&Value::Null, &[Value::from(1), Value::from(2)]),
            Ok(Value::from(1))
        );
        assert_eq!(func.call(&Value::from("me"), &[]), Ok(Value::from("me")));
    }

    #[test]
    fn test_equality_is_identity() {
        let a = Function::new("f", |_, _| Ok(Value::Null));
        let b = Function::new("f", |_, _| Ok(Value::Null));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_error_messages() {
        let err = FunctionError::InvalidArgument {
            function: "in".to_string(),
            expected: "array",
        };
        assert_eq!(
            err.to_string(),
            "invalid argument to function \"in\" (array expected)"
        );
        assert_eq!(FunctionError::failed("boom").to_string(), "boom");
    }
}
