//! Plain-text source excerpts for error reports.

use crate::parser::Position;

use std::fmt::Write;

const RED_BOLD: &str = "\x1b[1;31m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// How much context an excerpt shows and whether it is ANSI highlighted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptOptions {
    /// Lines shown before the offending line.
    pub above: usize,
    /// Lines shown after the offending line.
    pub below: usize,
    pub color: bool,
}

impl Default for ExcerptOptions {
    fn default() -> Self {
        Self {
            above: 2,
            below: 2,
            color: false,
        }
    }
}

/// Renders `message` followed by the source lines around `position`, with
/// a caret under the offending column.
pub fn render_excerpt(
    source: &str,
    position: Position,
    message: &str,
    options: &ExcerptOptions,
) -> String {
    let lines: Vec<&str> = source.split('\n').map(|l| l.trim_end_matches('\r')).collect();
    let target = position.line.clamp(1, lines.len()) - 1;
    let first = target.saturating_sub(options.above);
    let last = (target + options.below).min(lines.len() - 1);
    let width = (last + 1).to_string().len();

    let (red, bold, reset) = if options.color {
        (RED_BOLD, BOLD, RESET)
    } else {
        ("", "", "")
    };

    let mut out = String::new();
    let _ = writeln!(out, "{red}ERROR{reset}: {message}");
    for (index, line) in lines.iter().enumerate().take(last + 1).skip(first) {
        if index == target {
            let _ = writeln!(out, "{bold}{:>width$}{reset} | {line}", index + 1);
            // Keep tabs so the caret lines up with the rendered text.
            let padding: String = line
                .chars()
                .take(position.column.saturating_sub(1))
                .map(|c| if c == '\t' { '\t' } else { ' ' })
                .collect();
            let _ = writeln!(out, "{:>width$} | {padding}{red}^{reset}", "");
        } else {
            let _ = writeln!(out, "{:>width$} | {line}", index + 1);
        }
    }
    out
}
