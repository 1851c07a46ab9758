// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-to-live values

use chrono::{DateTime, Utc};
use std::time::Duration;

/// When a scheduled key should expire.
///
/// Either a plain duration in milliseconds or an absolute deadline. Both are
/// turned into "milliseconds remaining from now" before reaching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Milliseconds from the moment of the call
    Millis(i64),
    /// Absolute point in time
    At(DateTime<Utc>),
}

impl Ttl {
    pub fn millis(ms: i64) -> Self {
        Ttl::Millis(ms)
    }

    pub fn at(deadline: DateTime<Utc>) -> Self {
        Ttl::At(deadline)
    }

    /// Milliseconds remaining relative to `now`.
    ///
    /// Not clamped: a deadline in the past yields a negative value, which is
    /// handed to the store unchanged.
    pub fn remaining_millis(&self, now: DateTime<Utc>) -> i64 {
        match self {
            Ttl::Millis(ms) => *ms,
            Ttl::At(deadline) => (*deadline - now).num_milliseconds(),
        }
    }
}

impl From<Duration> for Ttl {
    fn from(duration: Duration) -> Self {
        Ttl::Millis(i64::try_from(duration.as_millis()).unwrap_or(i64::MAX))
    }
}

impl From<DateTime<Utc>> for Ttl {
    fn from(deadline: DateTime<Utc>) -> Self {
        Ttl::At(deadline)
    }
}
