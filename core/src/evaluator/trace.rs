//! Per-node evaluation tracing.

use crate::parser::{NodeKind, Position};
use crate::values::Value;

use std::fmt;

/// Maximum number of characters of a result shown in a trace line.
pub const SUMMARY_LIMIT: usize = 40;

/// Entry into or exit from evaluating one AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    Enter {
        kind: NodeKind,
        depth: usize,
        position: Position,
    },
    Exit {
        kind: NodeKind,
        depth: usize,
        summary: String,
    },
}

impl TraceEvent {
    pub fn depth(&self) -> usize {
        match self {
            TraceEvent::Enter { depth, .. } | TraceEvent::Exit { depth, .. } => *depth,
        }
    }
}

/// Renders the event as an indented line: `Kind {` on entry and
/// `}: summary` on exit.
impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = self.depth() * 4;
        match self {
            TraceEvent::Enter { kind, .. } => write!(f, "{:indent$}{kind} {{", ""),
            TraceEvent::Exit { summary, .. } => write!(f, "{:indent$}}}: {summary}", ""),
        }
    }
}

/// Receives trace events. Implemented for any `FnMut(&TraceEvent)`.
pub trait Tracer {
    fn trace(&mut self, event: &TraceEvent);
}

impl<F> Tracer for F
where
    F: FnMut(&TraceEvent),
{
    fn trace(&mut self, event: &TraceEvent) {
        self(event)
    }
}

/// Literal rendering of a value, cut to [`SUMMARY_LIMIT`] characters plus
/// `...` when longer.
pub fn summarize(value: &Value) -> String {
    let rendered = value.to_string();
    match rendered.char_indices().nth(SUMMARY_LIMIT) {
        Some((cut, _)) => format!("{}...", &rendered[..cut]),
        None => rendered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_summary_truncation() {
        assert_eq!(summarize(&Value::from(42)), "42");
        let long = Value::from("x".repeat(60));
        let summary = summarize(&long);
        assert_eq!(summary, format!("\"{}...", "x".repeat(39)));
        assert_eq!(summary.chars().count(), SUMMARY_LIMIT + 3);
    }

    #[test]
    fn test_event_lines() {
        let enter = TraceEvent::Enter {
            kind: NodeKind::Select,
            depth: 2,
            position: Position::new(1, 1),
        };
        let exit = TraceEvent::Exit {
            kind: NodeKind::Select,
            depth: 2,
            summary: "true".to_string(),
        };
        assert_eq!(enter.to_string(), "        Select {");
        assert_eq!(exit.to_string(), "        }: true");
    }

    #[test]
    fn test_closures_are_tracers() {
        let mut seen = Vec::new();
        let mut tracer = |event: &TraceEvent| seen.push(event.depth());
        tracer.trace(&TraceEvent::Exit {
            kind: NodeKind::LiteralNumber,
            depth: 3,
            summary: "1".to_string(),
        });
        assert_eq!(seen, vec![3]);
    }
}
