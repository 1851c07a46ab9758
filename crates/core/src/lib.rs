// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lapse-core: handler bookkeeping for the lapse expiry scheduler
//!
//! This crate provides:
//! - `PatternMatcher` - compiled match-expressions tested against expired keys
//! - `HandlerRegistry` - exact-key and pattern handler lists with ordered fan-out
//! - `Ttl` - duration or deadline, normalized to milliseconds remaining
//! - Clock abstraction for testable time handling

pub mod clock;
pub mod pattern;
pub mod registry;
pub mod ttl;
pub mod validate;

// Re-exports
pub use clock::{Clock, FakeClock, SystemClock};
pub use pattern::{PatternError, PatternMatcher};
pub use registry::HandlerRegistry;
pub use ttl::Ttl;
pub use validate::ValidationError;
