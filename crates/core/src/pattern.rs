// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern matching for expired keys

use regex::Regex;
use thiserror::Error;

/// Errors from compiling a pattern source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("invalid pattern {pattern:?}: {reason}")]
    Invalid { pattern: String, reason: String },
}

/// A compiled match-expression.
///
/// Matching is unanchored: the pattern only has to match somewhere inside the
/// key, so `test-*` accepts `test-1` as well as `my-test`.
#[derive(Clone, Debug)]
pub struct PatternMatcher {
    source: String,
    regex: Regex,
}

impl PatternMatcher {
    pub fn new(source: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(source).map_err(|e| PatternError::Invalid {
            pattern: source.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// Check if this pattern matches a key
    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The source string the matcher was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
