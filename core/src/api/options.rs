//! Engine configuration.

use crate::cache::DEFAULT_CACHE_LIMIT;
use crate::parser::DEFAULT_MAX_PARSE_DEPTH;

/// Options fixed when an [`Engine`](super::Engine) is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Number of compiled expressions kept in the cache. `0` disables it.
    pub cache_limit: usize,
    /// Maximum nesting depth accepted by the parser.
    pub max_parse_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            cache_limit: DEFAULT_CACHE_LIMIT,
            max_parse_depth: DEFAULT_MAX_PARSE_DEPTH,
        }
    }
}

impl EngineOptions {
    /// Replaces every option set in `overrides`.
    pub fn override_with(&mut self, overrides: &EngineOptionsOverride) {
        if let Some(cache_limit) = overrides.cache_limit {
            self.cache_limit = cache_limit;
        }
        if let Some(max_parse_depth) = overrides.max_parse_depth {
            self.max_parse_depth = max_parse_depth;
        }
    }

    /// Copy of `self` with `overrides` applied.
    pub fn with_overrides(&self, overrides: &EngineOptionsOverride) -> Self {
        let mut options = self.clone();
        options.override_with(overrides);
        options
    }
}

/// Partial [`EngineOptions`]: `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptionsOverride {
    pub cache_limit: Option<usize>,
    pub max_parse_depth: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.cache_limit, 100);
        assert_eq!(options.max_parse_depth, 64);
    }

    #[test]
    fn test_override_with() {
        let mut options = EngineOptions::default();
        options.override_with(&EngineOptionsOverride {
            cache_limit: Some(5),
            max_parse_depth: None,
        });
        assert_eq!(options.cache_limit, 5);
        assert_eq!(options.max_parse_depth, 64);

        let options = options.with_overrides(&EngineOptionsOverride {
            max_parse_depth: Some(20),
            ..Default::default()
        });
        assert_eq!(
            options,
            EngineOptions {
                cache_limit: 5,
                max_parse_depth: 20,
            }
        );
    }
}
