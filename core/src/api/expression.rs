//! Compiled AEL expressions.

use crate::parser::Node;

use std::sync::Arc;

/// A parsed expression ready for execution.
///
/// Produced by [`Engine::compile`](super::Engine::compile) and shared
/// through the engine's cache, so the same text compiles to the same
/// `Arc` while it stays cached.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: Arc<str>,
    ast: Node,
}

impl CompiledExpression {
    pub(crate) fn new(source: Arc<str>, ast: Node) -> Self {
        Self { source, ast }
    }

    /// The expression text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn shared_source(&self) -> Arc<str> {
        Arc::clone(&self.source)
    }

    pub fn ast(&self) -> &Node {
        &self.ast
    }

    /// Indented one-node-per-line rendering of the AST.
    pub fn dump(&self) -> String {
        self.ast.dump()
    }
}
