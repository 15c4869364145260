//! Route pattern matching logic.
//!
//! # Responsibilities
//! - Compile a pattern string once, at registration
//! - Decide whether a pattern matches the whole search string
//! - Extract capturing groups in left-to-right order
//!
//! # Design Decisions
//! - Patterns are unanchored; only a first match covering the entire search
//!   string counts, so a pattern matching a sub-range never wins
//! - Empty matches never count
//! - Look-around is supported (`fancy-regex`), so query-string constraints can
//!   be written as look-aheads

use fancy_regex::Regex;

use crate::routing::RouterError;

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile `source` as a regular expression.
    pub fn compile(source: impl Into<String>) -> Result<Self, RouterError> {
        let source = source.into();
        match Regex::new(&source) {
            Ok(regex) => Ok(Self { source, regex }),
            Err(e) => Err(RouterError::InvalidPattern {
                pattern: source,
                source: e,
            }),
        }
    }

    /// The pattern string this was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Number of capturing groups, not counting the implicit whole-match group.
    pub fn capture_count(&self) -> usize {
        self.regex.captures_len().saturating_sub(1)
    }

    /// Match against the whole of `target`.
    ///
    /// Returns the captured groups when the first match found in `target` is
    /// non-empty and spans all of it. Groups that did not participate in the
    /// match yield empty strings. Errors come from the regex engine at match
    /// time (e.g. backtracking limits).
    pub fn match_full(&self, target: &str) -> Result<Option<Vec<String>>, fancy_regex::Error> {
        let Some(caps) = self.regex.captures(target)? else {
            return Ok(None);
        };
        let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        if matched.is_empty() || matched != target {
            return Ok(None);
        }

        let captures = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();
        Ok(Some(captures))
    }
}
