// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! lapse scheduling engine
//!
//! Schedules keys with a TTL on an external store and fans each expiry
//! notification out to the handlers registered for the key or for any
//! pattern matching it.

mod config;
mod dispatch;
mod error;
mod event;
mod handler;
mod listener;
mod options;
mod scheduler;

pub use config::{ConfigError, SchedulerConfig};
pub use dispatch::DispatchReport;
pub use error::SchedulerError;
pub use event::{ClientRole, ConnectionStatus, SchedulerEvent};
pub use handler::{Handler, HandlerError, HandlerResult};
pub use options::{CancelOptions, HandlerOptions, RescheduleOptions, ScheduleOptions};
pub use scheduler::Scheduler;

pub use lapse_core::{Clock, FakeClock, SystemClock, Ttl, ValidationError};
