// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handler registry: exact keys and patterns mapped to ordered handler lists
//!
//! The registry is read at notification time, so a handler added after a key
//! was scheduled but before it expires still takes part in that dispatch.

use crate::pattern::{PatternError, PatternMatcher};
use std::collections::HashMap;

/// Handlers registered under one pattern source
#[derive(Debug)]
struct PatternEntry<H> {
    matcher: PatternMatcher,
    handlers: Vec<H>,
}

/// Maps keys and patterns to the handlers that fire when a key expires.
///
/// Generic over the handler value; `dispatch` hands out clones, so `H` is
/// expected to be a cheap handle such as an `Arc`.
#[derive(Debug)]
pub struct HandlerRegistry<H> {
    exact: HashMap<String, Vec<H>>,
    /// Kept in registration order; dispatch visits patterns in this order
    patterns: Vec<PatternEntry<H>>,
}

impl<H> Default for HandlerRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> HandlerRegistry<H> {
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            patterns: Vec::new(),
        }
    }

    /// Append a handler for an exact key
    pub fn add_exact(&mut self, key: &str, handler: H) {
        self.exact.entry(key.to_string()).or_default().push(handler);
    }

    /// Append a handler for a pattern.
    ///
    /// The pattern is compiled the first time its source is seen; later
    /// registrations with the same source reuse that matcher.
    pub fn add_pattern(&mut self, source: &str, handler: H) -> Result<(), PatternError> {
        if let Some(entry) = self
            .patterns
            .iter_mut()
            .find(|entry| entry.matcher.source() == source)
        {
            entry.handlers.push(handler);
            return Ok(());
        }

        let matcher = PatternMatcher::new(source)?;
        self.patterns.push(PatternEntry {
            matcher,
            handlers: vec![handler],
        });
        Ok(())
    }

    /// Remove every handler for an exact key
    pub fn remove_exact(&mut self, key: &str) {
        self.exact.remove(key);
    }

    /// Remove every handler for a pattern source
    pub fn remove_pattern(&mut self, source: &str) {
        self.patterns.retain(|entry| entry.matcher.source() != source);
    }

    /// Drop all registrations
    pub fn reset_all(&mut self) {
        self.exact.clear();
        self.patterns.clear();
    }

    /// Number of handlers registered for an exact key
    pub fn exact_count(&self, key: &str) -> usize {
        self.exact.get(key).map_or(0, Vec::len)
    }

    /// Number of handlers registered for a pattern source
    pub fn pattern_count(&self, source: &str) -> usize {
        self.patterns
            .iter()
            .find(|entry| entry.matcher.source() == source)
            .map_or(0, |entry| entry.handlers.len())
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.patterns.is_empty()
    }
}

impl<H: Clone> HandlerRegistry<H> {
    /// Resolve the handlers that fire for an expired key.
    ///
    /// Exact handlers come first in registration order, followed by the
    /// handlers of every matching pattern, patterns in registration order.
    /// A handler reachable through both lists appears once per list.
    pub fn dispatch(&self, key: &str) -> Vec<H> {
        let mut handlers: Vec<H> = self.exact.get(key).cloned().unwrap_or_default();

        for entry in &self.patterns {
            if entry.matcher.matches(key) {
                handlers.extend(entry.handlers.iter().cloned());
            }
        }

        handlers
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
