//! Name to host function lookup used at call sites.

use crate::values::{Function, FunctionError, Value};

use hashbrown::HashMap;

/// Callable names visible to expressions.
///
/// Variables in the evaluation bags shadow registered functions of the same
/// name.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the standard library.
    pub fn with_stdlib() -> Self {
        let mut registry = Self::new();
        crate::stdlib::register_stdlib(&mut registry);
        registry
    }

    /// Registers `function` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, function: Function) {
        let name = name.into();
        tracing::debug!(name = %name, "registering function");
        self.functions.insert(name, function);
    }

    /// Wraps `func` in a [`Function`] named `name` and registers it.
    pub fn register_fn<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.register(name, Function::new(name, func));
    }

    pub fn resolve(&self, name: &str) -> Option<Function> {
        self.functions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        registry.register_fn("twice", |_, args| {
            let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
            Ok(Value::Number(n * 2.0))
        });
        assert!(registry.contains("twice"));
        assert_eq!(registry.len(), 1);

        let twice = registry.resolve("twice").unwrap();
        assert_eq!(twice.name(), "twice");
        assert_eq!(
            twice.call(&Value::Undefined, &[Value::from(21)]),
            Ok(Value::from(42))
        );
        assert!(registry.resolve("thrice").is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = FunctionRegistry::new();
        registry.register_fn("f", |_, _| Ok(Value::from(1)));
        registry.register_fn("f", |_, _| Ok(Value::from(2)));
        assert_eq!(registry.len(), 1);
        let f = registry.resolve("f").unwrap();
        assert_eq!(f.call(&Value::Undefined, &[]), Ok(Value::from(2)));
    }

    #[test]
    fn test_with_stdlib() {
        let registry = FunctionRegistry::with_stdlib();
        assert_eq!(
            registry.names(),
            vec!["count", "in", "index", "lc", "substr", "trim", "uc"]
        );
    }
}
