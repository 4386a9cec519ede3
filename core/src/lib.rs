//! Core of the AEL expression language: value model, coercion engine,
//! parser, tree-walking evaluator, function registry and the
//! compiled-expression cache.
//!
//! Most users want the [`api::Engine`] entry point:
//!
//! ```
//! use ael_core::api::Engine;
//! use ael_core::values::{Map, Value};
//!
//! let engine = Engine::default();
//! let vars: Map = [("a".to_string(), Value::from(40))].into_iter().collect();
//! let result = engine.evaluate("a + 2", &vars, &mut Map::new()).unwrap();
//! assert_eq!(result, Value::Number(42.0));
//! ```

pub mod api;
pub mod cache;
pub mod diagnostics;
pub mod evaluator;
pub mod parser;
pub mod registry;
pub mod stdlib;
pub mod values;

pub use api::{Engine, EngineOptions, EngineOptionsOverride, Error, ErrorKind};
pub use parser::Position;
pub use values::{Map, Value};

/// Version of the AEL core crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    #[test]
    fn version_is_semver_like() {
        assert_eq!(super::version().split('.').count(), 3);
    }
}

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_cache_eviction() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
