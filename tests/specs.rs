//! Behavioral specifications for the lapse scheduler.
//!
//! These tests run the engine on the memory backend in real time and check
//! what handlers observe: which ones run, in what order, and when.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/dispatch.rs"]
mod dispatch;
#[path = "specs/scheduling.rs"]
mod scheduling;
#[path = "specs/validation.rs"]
mod validation;
