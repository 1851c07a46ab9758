// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Arguments for the scheduling operations.
//!
//! Every struct derives `Default`, which leaves the required fields empty;
//! the operations reject such values with a `ValidationError`.

use crate::handler::Handler;
use lapse_core::Ttl;

/// Arguments for `Scheduler::schedule`
#[derive(Debug, Clone, Default)]
pub struct ScheduleOptions {
    pub key: String,
    /// When absent only the handler is registered; the store is not touched
    pub ttl: Option<Ttl>,
    pub handler: Option<Handler>,
    /// Treat `key` as a pattern source rather than a literal key
    pub pattern: bool,
}

impl ScheduleOptions {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn ttl(mut self, ttl: impl Into<Ttl>) -> Self {
        self.ttl = Some(ttl.into());
        self
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn pattern(mut self, pattern: bool) -> Self {
        self.pattern = pattern;
        self
    }
}

/// Arguments for `Scheduler::reschedule`
#[derive(Debug, Clone, Default)]
pub struct RescheduleOptions {
    pub key: String,
    pub ttl: Option<Ttl>,
}

impl RescheduleOptions {
    pub fn new(key: impl Into<String>, ttl: impl Into<Ttl>) -> Self {
        Self {
            key: key.into(),
            ttl: Some(ttl.into()),
        }
    }
}

/// Arguments for `Scheduler::add_handler`
#[derive(Debug, Clone, Default)]
pub struct HandlerOptions {
    pub key: String,
    pub handler: Option<Handler>,
    pub pattern: bool,
}

impl HandlerOptions {
    pub fn new(key: impl Into<String>, handler: Handler) -> Self {
        Self {
            key: key.into(),
            handler: Some(handler),
            pattern: false,
        }
    }

    pub fn pattern(mut self, pattern: bool) -> Self {
        self.pattern = pattern;
        self
    }
}

/// Arguments for `Scheduler::cancel`
#[derive(Debug, Clone, Default)]
pub struct CancelOptions {
    pub key: String,
}

impl CancelOptions {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}
