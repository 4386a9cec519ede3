//! Public API for the AEL expression language.
//!
//! An [`Engine`] compiles expression text into shared
//! [`CompiledExpression`]s (cached by exact text) and executes them against
//! a read-only `vars` bag and a read-write `state` bag.
//!
//! # Example
//!
//! ```
//! use ael_core::api::{Engine, EngineOptions, EngineOptionsOverride};
//! use ael_core::values::{Map, Value};
//!
//! let options = EngineOptions::default().with_overrides(&EngineOptionsOverride {
//!     cache_limit: Some(10),
//!     ..Default::default()
//! });
//! let engine = Engine::new(options);
//!
//! let vars: Map = [("a".to_string(), Value::from("xy"))].into_iter().collect();
//! let mut state = Map::new();
//! let result = engine
//!     .evaluate("a =~ /^(x)(y)$/ ? $1 : 'none'", &vars, &mut state)
//!     .unwrap();
//! assert_eq!(result, Value::from("x"));
//! ```

pub mod engine;
pub mod error;
pub mod expression;
pub mod options;

pub use engine::Engine;
pub use error::{Error, ErrorKind};
pub use expression::CompiledExpression;
pub use options::{EngineOptions, EngineOptionsOverride};
