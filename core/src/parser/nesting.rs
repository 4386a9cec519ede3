//! Bracket nesting check run before the grammar.
//!
//! The generated parser recurses once per bracket level, so input nested
//! beyond the limit is rejected before it reaches the grammar. The scan
//! skips brackets inside strings, regexps, template text and comments.

use crate::parser::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    Paren,
    Bracket,
    Brace,
    Template,
    TemplateExpr,
    Ternary,
}

/// Fails with the position of the first opener that nests deeper than
/// `max_depth`.
pub(super) fn check_nesting(source: &str, max_depth: usize) -> Result<(), Position> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut stack: Vec<Opener> = Vec::new();
    // Whether the last significant token ends an operand, which makes a
    // following `/` a division rather than the start of a regexp.
    let mut after_operand = false;
    let mut i = 0;

    let push = |stack: &mut Vec<Opener>, opener: Opener, offset: usize| {
        stack.push(opener);
        if stack.len() > max_depth {
            Err(position_at(source, offset))
        } else {
            Ok(())
        }
    };

    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|&(_, c)| c);

        if stack.last() == Some(&Opener::Template) {
            match c {
                '\\' => i += 1,
                '`' => {
                    stack.pop();
                    after_operand = true;
                }
                '$' if next == Some('{') => {
                    i += 1;
                    push(&mut stack, Opener::TemplateExpr, offset)?;
                    after_operand = false;
                }
                _ => {}
            }
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' => {
                i = skip_quoted(&chars, i, c);
                after_operand = true;
                continue;
            }
            '/' if next == Some('/') => {
                while i < chars.len() && chars[i].1 != '\n' {
                    i += 1;
                }
                continue;
            }
            '/' if next == Some('*') => {
                i += 2;
                while i < chars.len()
                    && !(chars[i].1 == '*' && chars.get(i + 1).map(|p| p.1) == Some('/'))
                {
                    i += 1;
                }
                i += 2;
                continue;
            }
            '/' if !after_operand => {
                i = skip_regexp(&chars, i);
                after_operand = true;
                continue;
            }
            '`' => {
                push(&mut stack, Opener::Template, offset)?;
            }
            '(' => {
                push(&mut stack, Opener::Paren, offset)?;
                after_operand = false;
            }
            '[' => {
                push(&mut stack, Opener::Bracket, offset)?;
                after_operand = false;
            }
            '{' => {
                push(&mut stack, Opener::Brace, offset)?;
                after_operand = false;
            }
            ')' | ']' | '}' => {
                let expected: &[Opener] = match c {
                    ')' => &[Opener::Paren],
                    ']' => &[Opener::Bracket],
                    _ => &[Opener::Brace, Opener::TemplateExpr],
                };
                if stack.last().is_some_and(|top| expected.contains(top)) {
                    stack.pop();
                }
                after_operand = true;
            }
            '?' => match next {
                Some(':') | Some('.') => {
                    i += 1;
                    after_operand = false;
                }
                _ => {
                    push(&mut stack, Opener::Ternary, offset)?;
                    after_operand = false;
                }
            },
            ':' => {
                if stack.last() == Some(&Opener::Ternary) {
                    stack.pop();
                }
                after_operand = false;
            }
            c if c.is_whitespace() => {}
            c if c.is_alphanumeric() || c == '_' || c == '$' => after_operand = true,
            _ => after_operand = false,
        }
        i += 1;
    }
    Ok(())
}

/// Index just past the string literal opened by `quote` at `start`.
fn skip_quoted(chars: &[(usize, char)], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

/// Index just past the regexp body opened at `start`; flags are scanned as
/// an ordinary name.
fn skip_regexp(chars: &[(usize, char)], start: usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i].1 {
            '\\' => i += 2,
            '/' => return i + 1,
            '\n' => return i,
            _ => i += 1,
        }
    }
    chars.len()
}

fn position_at(source: &str, offset: usize) -> Position {
    let before = &source[..offset];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().unwrap_or("").chars().count() + 1;
    Position::new(line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counts_every_bracket_kind() {
        assert_eq!(check_nesting("([{1}])", 3), Ok(()));
        assert_eq!(check_nesting("([{1}])", 2), Err(Position::new(1, 3)));
        assert_eq!(check_nesting("f(1)(2)(3)[0]", 1), Ok(()));
    }

    #[test]
    fn test_reports_position_of_offending_opener() {
        assert_eq!(check_nesting("a +\n  ((b))", 1), Err(Position::new(2, 4)));
    }

    #[test]
    fn test_ternary_middles_nest() {
        assert_eq!(check_nesting("a ? b ? c : d : e", 2), Ok(()));
        assert_eq!(check_nesting("a ? b ? c : d : e", 1), Err(Position::new(1, 7)));
        // Else branches chain without nesting
        assert_eq!(check_nesting("a ? b : c ? d : e ?: f", 1), Ok(()));
        assert_eq!(check_nesting("x ? {a: 1} : 2", 2), Ok(()));
        assert_eq!(check_nesting("a?.b?.(c)", 1), Ok(()));
    }

    #[test]
    fn test_ignores_brackets_in_literals_and_comments() {
        assert_eq!(check_nesting(r#""((((" + '[[[' + "\"(""#, 0), Ok(()));
        assert_eq!(check_nesting(r"a =~ /\(((/ // ((((", 0), Ok(()));
        assert_eq!(check_nesting("1 /* ((( */ + 2", 0), Ok(()));
        assert_eq!(check_nesting("`((( ${ a } (((`", 2), Ok(()));
        assert_eq!(check_nesting("`${ `${ (1) }` }`", 4), Err(Position::new(1, 9)));
    }

    #[test]
    fn test_division_is_not_a_regexp() {
        assert_eq!(check_nesting("(a) / 2 / (b)", 1), Ok(()));
        assert_eq!(check_nesting("a / ((b))", 1), Err(Position::new(1, 6)));
    }

    #[test]
    fn test_deep_input_is_rejected_without_recursion() {
        let source = "[".repeat(100_000);
        assert_eq!(check_nesting(&source, 64), Err(Position::new(1, 65)));
    }
}
