//! The AEL compilation and execution engine.

use super::{CompiledExpression, EngineOptions, Error};
use crate::cache::ExpressionCache;
use crate::evaluator::{EvalContext, Evaluator, Tracer};
use crate::parser;
use crate::registry::FunctionRegistry;
use crate::values::{Function, FunctionError, Map, Value};

use parking_lot::Mutex;
use std::sync::Arc;

/// Compiles expressions (through a bounded cache) and evaluates them
/// against caller-supplied variables.
///
/// # Example
///
/// ```
/// use ael_core::api::Engine;
/// use ael_core::values::{Map, Value};
///
/// let engine = Engine::default();
/// let vars: Map = [("name".to_string(), Value::from("  Ada "))].into_iter().collect();
/// let mut state = Map::new();
///
/// let expr = engine.compile("who = uc(trim(name)); `hi ${who}`").unwrap();
/// let result = engine.execute(&expr, &vars, &mut state).unwrap();
/// assert_eq!(result, Value::from("hi ADA"));
/// assert_eq!(state.get("who"), Some(&Value::from("ADA")));
/// ```
pub struct Engine {
    options: EngineOptions,
    functions: FunctionRegistry,
    cache: Mutex<ExpressionCache<CompiledExpression>>,
}

static_assertions::assert_impl_all!(Engine: Send, Sync);

impl Engine {
    /// Creates an engine with the standard library registered.
    pub fn new(options: EngineOptions) -> Self {
        let cache = ExpressionCache::new(options.cache_limit);
        Self {
            options,
            functions: FunctionRegistry::with_stdlib(),
            cache: Mutex::new(cache),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Makes `func` callable from expressions as `name(...)`, replacing any
    /// function already registered under that name.
    pub fn register_function<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&Value, &[Value]) -> Result<Value, FunctionError> + Send + Sync + 'static,
    {
        self.functions.register(name, Function::new(name, func));
    }

    /// Parses `text`, or returns the cached result of an earlier compile of
    /// the exact same text.
    pub fn compile(&self, text: &str) -> Result<Arc<CompiledExpression>, Error> {
        let max_depth = self.options.max_parse_depth;
        self.cache.lock().get_or_compile(text, |text| {
            let source: Arc<str> = Arc::from(text);
            match parser::parse_with_max_depth(text, max_depth) {
                Ok(ast) => {
                    let compiled = CompiledExpression::new(source, ast);
                    tracing::debug!(expression = text, "compiled expression");
                    tracing::trace!("AST:\n{}", compiled.dump());
                    Ok(compiled)
                }
                Err(err) => {
                    tracing::debug!(expression = text, error = %err, "parse failed");
                    Err(Error::from_parse(err, source))
                }
            }
        })
    }

    /// Evaluates `expr`. Reads resolve against `state` first and `vars`
    /// second; assignments and regex captures write to `state`.
    pub fn execute(
        &self,
        expr: &CompiledExpression,
        vars: &Map,
        state: &mut Map,
    ) -> Result<Value, Error> {
        let ctx = EvalContext::new(vars, state);
        Evaluator::new(expr.shared_source(), ctx, &self.functions, None).evaluate(expr.ast())
    }

    /// Like [`execute`](Self::execute), reporting every node entry and exit
    /// to `tracer`.
    pub fn execute_traced(
        &self,
        expr: &CompiledExpression,
        vars: &Map,
        state: &mut Map,
        tracer: &mut dyn Tracer,
    ) -> Result<Value, Error> {
        let ctx = EvalContext::new(vars, state);
        Evaluator::new(expr.shared_source(), ctx, &self.functions, Some(tracer))
            .evaluate(expr.ast())
    }

    /// Compiles (or fetches from the cache) and executes `text`.
    pub fn evaluate(&self, text: &str, vars: &Map, state: &mut Map) -> Result<Value, Error> {
        let expr = self.compile(text)?;
        self.execute(&expr, vars, state)
    }

    /// Changes the cache capacity, evicting immediately if it shrinks.
    pub fn set_cache_limit(&self, limit: usize) {
        self.cache.lock().set_limit(limit);
    }

    pub fn cache_limit(&self) -> usize {
        self.cache.lock().limit()
    }

    /// Number of compiled expressions currently cached.
    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineOptions::default())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("functions", &self.functions)
            .finish_non_exhaustive()
    }
}
