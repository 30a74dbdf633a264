// src/matcher.rs
// =============================================================================
// Decides whether a URL path is covered by the user's --match patterns.
//
// Patterns are shell-style globs, checked against the path component only:
//   /blog/*      matches /blog/hello but not /blog/2024/hello
//   /docs/**     matches /docs/a and /docs/a/b/c
//   /*.html      matches /index.html
//
// Several patterns are OR-ed together. Patterns are compiled once when the
// crawl starts, so a malformed pattern is a configuration error instead of
// something that shows up page by page.
// =============================================================================

use glob::{MatchOptions, Pattern};

use crate::error::ConfigError;

// `*` must not cross a `/`, otherwise "/blog/*" would swallow every
// sub-directory too
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
pub struct PathMatcher {
    patterns: Vec<Pattern>,
}

impl PathMatcher {
    /// Compiles a set of glob patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Pattern::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// True if any pattern matches the path.
    pub fn matches(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }
}

/// One-shot form of [`PathMatcher`]: compiles `patterns` and checks `path`.
pub fn matches<S: AsRef<str>>(path: &str, patterns: &[S]) -> Result<bool, ConfigError> {
    Ok(PathMatcher::new(patterns)?.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_star_stays_in_segment() {
        let matcher = PathMatcher::new(["/blog/*"]).unwrap();
        assert!(matcher.matches("/blog/hello"));
        assert!(!matcher.matches("/blog/2024/hello"));
        assert!(!matcher.matches("/about"));
    }

    #[test]
    fn test_double_star_crosses_segments() {
        let matcher = PathMatcher::new(["/docs/**"]).unwrap();
        assert!(matcher.matches("/docs/intro"));
        assert!(matcher.matches("/docs/guide/install"));
        assert!(!matcher.matches("/blog/intro"));
    }

    #[test]
    fn test_patterns_are_ored() {
        let matcher = PathMatcher::new(["/blog/*", "/about"]).unwrap();
        assert!(matcher.matches("/about"));
        assert!(matcher.matches("/blog/post"));
        assert!(!matcher.matches("/contact"));
    }

    #[test]
    fn test_malformed_pattern_is_config_error() {
        let err = PathMatcher::new(["/docs/[abc"]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "/docs/[abc"));
    }

    #[test]
    fn test_one_shot_matches() {
        assert!(matches("/guide/a", &["/guide/*"]).unwrap());
        assert!(!matches("/guide/a", &["/api/*"]).unwrap());
    }
}
