//! Escape handling for string, template and regexp literals.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnescapeError {
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),
    #[error("invalid unicode escape '{0}'")]
    InvalidUnicode(String),
    #[error("unterminated escape sequence")]
    Unterminated,
}

/// Resolves backslash escapes in the body of a quoted string or template
/// text segment.
///
/// Supported: `\n \t \r \0 \b \f \v \\ \' \" \` \$ \/`, `\xHH`, `\uHHHH` and
/// `\u{H...}`. A backslash followed by a newline is a line continuation.
pub fn unescape(text: &str) -> Result<String, UnescapeError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = chars.next().ok_or(UnescapeError::Unterminated)?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '\n' => {}
            '\\' | '\'' | '"' | '`' | '$' | '/' => out.push(escaped),
            'x' => {
                let digits: String = chars.by_ref().take(2).collect();
                out.push(code_point(&digits, 2)?);
            }
            'u' => {
                let rest = chars.as_str();
                if let Some(braced) = rest.strip_prefix('{') {
                    let end = braced
                        .find('}')
                        .ok_or_else(|| UnescapeError::InvalidUnicode(rest.to_string()))?;
                    let digits = &braced[..end];
                    if digits.is_empty() || digits.len() > 6 {
                        return Err(UnescapeError::InvalidUnicode(digits.to_string()));
                    }
                    out.push(code_point(digits, digits.len())?);
                    // Skip `{`, the digits and `}`.
                    chars = braced[end + 1..].chars();
                } else {
                    let digits: String = chars.by_ref().take(4).collect();
                    out.push(code_point(&digits, 4)?);
                }
            }
            other => return Err(UnescapeError::InvalidEscape(other)),
        }
    }
    Ok(out)
}

fn code_point(digits: &str, expected_len: usize) -> Result<char, UnescapeError> {
    let invalid = || UnescapeError::InvalidUnicode(digits.to_string());
    if digits.len() != expected_len || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u32::from_str_radix(digits, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(invalid)
}

/// Unescapes `\/` in a regexp literal body; every other escape is left for
/// the regex engine.
pub fn unescape_regexp(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('/') => out.push('/'),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_simple_escapes() {
        assert_eq!(unescape(r#"a\nb\t\"c\" \'d\' \\"#).unwrap(), "a\nb\t\"c\" 'd' \\");
        assert_eq!(unescape(r"\$\{x}").unwrap_err(), UnescapeError::InvalidEscape('{'));
        assert_eq!(unescape(r"\`\$").unwrap(), "`$");
    }

    #[test]
    fn test_hex_and_unicode_escapes() {
        assert_eq!(unescape(r"\x41é\u{1F600}!").unwrap(), "Aé😀!");
        assert_eq!(
            unescape(r"\x4").unwrap_err(),
            UnescapeError::InvalidUnicode("4".to_string())
        );
        assert_eq!(
            unescape(r"\u{110000}").unwrap_err(),
            UnescapeError::InvalidUnicode("110000".to_string())
        );
        assert_eq!(unescape(r"\u{}").unwrap_err(), UnescapeError::InvalidUnicode(String::new()));
    }

    #[test]
    fn test_trailing_backslash() {
        assert_eq!(unescape("abc\\").unwrap_err(), UnescapeError::Unterminated);
    }

    #[test]
    fn test_regexp_body() {
        assert_eq!(unescape_regexp(r"^a\/b\d+$"), r"^a/b\d+$");
    }
}
