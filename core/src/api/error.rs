//! Public error type for compiling and executing expressions.
//!
//! Leaf errors (`ParseError`, `CoercionError`, `FunctionError`) are
//! converted into [`Error`] at the point where the failing node's position
//! and the source text are known.

use crate::diagnostics::{ExcerptOptions, render_excerpt};
use crate::parser::{ParseError, Position};

use std::fmt;
use std::sync::Arc;

/// Category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The expression text is not valid syntax.
    Parse,
    /// A variable or function name was found in neither `state` nor `vars`
    /// (nor the function registry, for calls).
    UnknownVariable,
    /// A non-optional selection step on null, undefined or a non-container.
    PropertyAccess,
    /// A call on a value that is not a function.
    NotCallable,
    /// A conversion failed, e.g. compiling an invalid regular expression.
    Coercion,
    /// A malformed AST reached the evaluator.
    Internal,
    /// A host function reported a failure.
    Function,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "ParseError",
            ErrorKind::UnknownVariable => "UnknownVariableError",
            ErrorKind::PropertyAccess => "PropertyAccessError",
            ErrorKind::NotCallable => "NotCallableError",
            ErrorKind::Coercion => "CoercionError",
            ErrorKind::Internal => "InternalError",
            ErrorKind::Function => "FunctionError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed compilation or evaluation.
///
/// The first failure aborts execution; there is no partial result.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// Evaluator phase that raised the error, e.g. `"select"` or `"call"`.
    pub origin: Option<&'static str>,
    pub position: Option<Position>,
    pub source: Option<Arc<str>>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            origin: None,
            position: None,
            source: None,
        }
    }

    pub fn with_origin(mut self, origin: &'static str) -> Self {
        self.origin = Some(origin);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_source(mut self, source: Arc<str>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Renders the lines around the error position with a caret under the
    /// offending column. Returns `None` when the error has no position or
    /// no source text attached.
    pub fn excerpt(&self, options: &ExcerptOptions) -> Option<String> {
        let source = self.source.as_deref()?;
        let position = self.position?;
        Some(render_excerpt(source, position, &self.message, options))
    }

    pub(crate) fn from_parse(err: ParseError, source: Arc<str>) -> Self {
        Error::new(ErrorKind::Parse, err.message)
            .with_origin("parse")
            .with_position(err.position)
            .with_source(source)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "{}: {}: {}", self.kind, position, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_without_position() {
        let err = Error::new(ErrorKind::UnknownVariable, "unknown variable \"x\"");
        assert_eq!(
            err.to_string(),
            "UnknownVariableError: unknown variable \"x\""
        );
    }

    #[test]
    fn test_display_with_position() {
        let err = Error::new(ErrorKind::PropertyAccess, "cannot read property \"b\" of undefined")
            .with_origin("select")
            .with_position(Position::new(3, 7));
        assert_eq!(
            err.to_string(),
            "PropertyAccessError: line 3, column 7: cannot read property \"b\" of undefined"
        );
        assert_eq!(err.origin, Some("select"));
    }

    #[test]
    fn test_excerpt_requires_position_and_source() {
        let err = Error::new(ErrorKind::Internal, "boom");
        assert_eq!(err.excerpt(&ExcerptOptions::default()), None);
        let err = err.with_position(Position::new(1, 1));
        assert_eq!(err.excerpt(&ExcerptOptions::default()), None);
        let err = err.with_source(Arc::from("x"));
        assert!(err.excerpt(&ExcerptOptions::default()).is_some());
    }

    #[test]
    fn test_excerpt_heading_is_the_bare_message() {
        let err = Error::new(ErrorKind::UnknownVariable, "unknown variable \"c\"")
            .with_position(Position::new(2, 5))
            .with_source(Arc::from("a = 1;\nb + c"));
        expect_test::expect![[r#"
            ERROR: unknown variable "c"
            1 | a = 1;
            2 | b + c
              |     ^
        "#]]
        .assert_eq(&err.excerpt(&ExcerptOptions::default()).unwrap());
    }
}
