//! AEL - Advanced Expression Language
//!
//! # Overview
//!
//! AEL is a small, embeddable expression language for evaluating boolean,
//! arithmetic and selection expressions against host-supplied data.
//! Common use cases include:
//!
//! - Access-control grants
//! - Filter predicates
//! - Conditional configuration values
//!
//! # Quick Start
//!
//! ```
//! use ael::{Engine, Map, Value};
//!
//! let engine = Engine::default();
//!
//! let vars: Map = [
//!     ("grant".to_string(), Value::from("login:^(?:rse|foo)$")),
//!     ("login".to_string(), Value::from("rse")),
//! ]
//! .into_iter()
//! .collect();
//! let mut state = Map::new();
//!
//! let expr = engine
//!     .compile("grant =~ /^login:(.+)$/ ? login =~ $1 : false")
//!     .unwrap();
//! let result = engine.execute(&expr, &vars, &mut state).unwrap();
//! assert_eq!(result, Value::from(true));
//! ```
//!
//! # Host Functions
//!
//! Register native Rust closures and call them from expressions:
//!
//! ```
//! use ael::{Engine, FunctionError, Map, Value};
//!
//! let mut engine = Engine::default();
//! engine.register_function("half", |_this, args| match args.first() {
//!     Some(Value::Number(n)) => Ok(Value::Number(n / 2.0)),
//!     _ => Err(FunctionError::InvalidArgument {
//!         function: "half".to_string(),
//!         expected: "number",
//!     }),
//! });
//!
//! let result = engine.evaluate("half(84)", &Map::new(), &mut Map::new()).unwrap();
//! assert_eq!(result, Value::from(42));
//! ```

// Error rendering utilities
pub mod error_renderer;
pub use error_renderer::{CharSet, RenderConfig, render_error, render_error_to};

// Re-export public API from ael_core
pub use ael_core::api::{
    CompiledExpression, Engine, EngineOptions, EngineOptionsOverride, Error, ErrorKind,
};
pub use ael_core::diagnostics::ExcerptOptions;
pub use ael_core::evaluator::{TraceEvent, Tracer};
pub use ael_core::parser::Position;
pub use ael_core::values::{self, Function, FunctionError, Map, RegExp, Value};
pub use ael_core::version;
