//! Error rendering using ariadne
//!
//! Renders [`Error`]s that carry a position and the expression text as an
//! annotated source snippet. Errors without location information fall back
//! to their one-line `Display` form.

use crate::{Error, Position};
use ariadne::{Color, Label, Report, ReportKind, Source};
use std::io::Write;
use std::ops::Range;

/// Character set for rendering error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    /// Use Unicode characters for rich visual output.
    #[default]
    Unicode,
    /// Use ASCII-only characters for compatibility.
    Ascii,
}

/// Configuration for error rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig<'a> {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The filename to display in error messages.
    /// Defaults to "<expression>" if not provided.
    pub filename: Option<&'a str>,
    /// The character set to use for rendering.
    pub charset: CharSet,
}

impl Default for RenderConfig<'_> {
    fn default() -> Self {
        Self {
            color: true,
            filename: None,
            charset: CharSet::Unicode,
        }
    }
}

/// Render an error to stderr using the default config.
///
/// # Example
/// ```no_run
/// use ael::{Engine, render_error};
///
/// let engine = Engine::default();
/// if let Err(e) = engine.compile("1 + * 2") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to(error, &mut std::io::stderr(), &RenderConfig::default()).ok();
}

/// Render an error to a writer with the given configuration.
///
/// # Example
/// ```
/// use ael::{Engine, RenderConfig, render_error_to};
///
/// let engine = Engine::default();
/// let err = engine.compile("1 + * 2").unwrap_err();
///
/// let mut buf = Vec::new();
/// let config = RenderConfig { color: false, ..Default::default() };
/// render_error_to(&err, &mut buf, &config).unwrap();
/// assert!(String::from_utf8_lossy(&buf).contains("1 + * 2"));
/// ```
pub fn render_error_to(
    error: &Error,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let (Some(source), Some(position)) = (error.source_text(), error.position()) else {
        return writeln!(writer, "{error}");
    };
    let filename = config.filename.unwrap_or("<expression>");
    let span = span_at(source, position);

    let charset = match config.charset {
        CharSet::Unicode => ariadne::CharSet::Unicode,
        CharSet::Ascii => ariadne::CharSet::Ascii,
    };
    let ariadne_config = ariadne::Config::default()
        .with_color(config.color)
        .with_char_set(charset);

    let mut report = Report::build(ReportKind::Error, (filename, span.clone()))
        .with_code(error.kind.as_str())
        .with_message(&error.message)
        .with_config(ariadne_config)
        .with_label(
            Label::new((filename, span))
                .with_message(&error.message)
                .with_color(Color::Red),
        );
    if let Some(origin) = error.origin {
        report = report.with_note(format!("raised by {origin}"));
    }

    report
        .finish()
        .write((filename, Source::from(source)), &mut *writer)
}

/// Character range covering the character at `position`, or an empty range
/// at the end of the text.
fn span_at(source: &str, position: Position) -> Range<usize> {
    let line_start: usize = source
        .split('\n')
        .take(position.line.saturating_sub(1))
        .map(|line| line.chars().count() + 1)
        .sum();
    let start = (line_start + position.column.saturating_sub(1)).min(source.chars().count());
    let end = (start + 1).min(source.chars().count());
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Engine, ErrorKind, Map};
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const UNICODE_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.ael"),
        charset: CharSet::Unicode,
    };

    const ASCII_CONFIG: RenderConfig = RenderConfig {
        color: false,
        filename: Some("test.ael"),
        charset: CharSet::Ascii,
    };

    fn render_error_string(source: &str, config: &RenderConfig) -> String {
        let engine = Engine::default();
        let err = engine
            .evaluate(source, &Map::new(), &mut Map::new())
            .expect_err("expected an error");
        let mut buf = Vec::new();
        render_error_to(&err, &mut buf, config).unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_parse_error_unicode() {
        let output = render_error_string("1 + * 2", &UNICODE_CONFIG);
        assert!(output.contains("[ParseError] Error:"), "{output}");
        assert!(output.contains("test.ael:1:5"), "{output}");
        assert!(output.contains("1 + * 2"), "{output}");
        assert!(output.contains('╭'), "{output}");
        assert!(output.contains("raised by parse"), "{output}");
    }

    #[test]
    fn test_parse_error_ascii() {
        let output = render_error_string("1 + * 2", &ASCII_CONFIG);
        assert!(output.contains("test.ael:1:5"), "{output}");
        assert!(!output.contains('╭'), "{output}");
        assert!(output.is_ascii(), "{output}");
    }

    #[test]
    fn test_runtime_error_on_later_line() {
        let source = indoc! {"
            a = 1;
            a + missing
        "};
        let output = render_error_string(source, &ASCII_CONFIG);
        assert!(
            output.contains("[UnknownVariableError] Error: unknown variable \"missing\""),
            "{output}"
        );
        assert!(output.contains("test.ael:2:5"), "{output}");
        assert!(output.contains("a + missing"), "{output}");
        assert!(output.contains("raised by variable"), "{output}");
    }

    #[test]
    fn test_error_without_position() {
        let err = Error::new(ErrorKind::Internal, "no location");
        let mut buf = Vec::new();
        render_error_to(&err, &mut buf, &UNICODE_CONFIG).unwrap();
        assert_eq!(
            String::from_utf8_lossy(&buf),
            "InternalError: no location\n"
        );
    }

    #[test]
    fn test_span_at() {
        let source = "ab\ncdé\nf";
        assert_eq!(span_at(source, Position::new(1, 1)), 0..1);
        assert_eq!(span_at(source, Position::new(2, 3)), 5..6);
        assert_eq!(span_at(source, Position::new(3, 1)), 7..8);
        assert_eq!(span_at(source, Position::new(3, 2)), 8..8);
    }

    #[test]
    fn test_render_config_default_charset() {
        let config = RenderConfig::default();
        assert_eq!(config.charset, CharSet::Unicode);
        assert!(config.color);
    }
}
