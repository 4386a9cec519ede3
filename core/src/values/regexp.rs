//! Regular expression values.
//!
//! Patterns use the `regex` crate syntax. Flags follow the familiar
//! slash-literal letters: `i` (case-insensitive), `m` (multi-line),
//! `s` (dot matches newline), `u` (unicode, always on). `g`, `y` and `d`
//! are accepted and ignored because matching is stateless.

use regex::{Regex, RegexBuilder};
use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegExpError {
    #[error("invalid regular expression /{pattern}/: {source}")]
    Syntax {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid regular expression flag '{flag}'")]
    Flag { flag: char },
}

/// A compiled regular expression together with its source and flags.
#[derive(Clone)]
pub struct RegExp {
    source: String,
    flags: String,
    regex: Regex,
}

impl RegExp {
    pub fn new(pattern: &str, flags: &str) -> Result<Self, RegExpError> {
        let mut builder = RegexBuilder::new(pattern);
        builder.unicode(true);
        for flag in flags.chars() {
            match flag {
                'i' => builder.case_insensitive(true),
                'm' => builder.multi_line(true),
                's' => builder.dot_matches_new_line(true),
                'u' | 'g' | 'y' | 'd' => &mut builder,
                other => return Err(RegExpError::Flag { flag: other }),
            };
        }
        let regex = builder.build().map_err(|source| RegExpError::Syntax {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            source: pattern.to_string(),
            flags: flags.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Number of capture groups, including the implicit whole-match group 0.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len()
    }

    /// Matches `text` and returns every group's text (index 0 is the whole
    /// match). Groups that did not participate are `None`.
    pub fn captures(&self, text: &str) -> Option<Vec<Option<String>>> {
        self.regex.captures(text).map(|caps| {
            caps.iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect()
        })
    }
}

impl PartialEq for RegExp {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl fmt::Debug for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegExp({self})")
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}
