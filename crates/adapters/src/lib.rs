// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external key-value store and its expiry notifications

pub mod channel;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;
pub mod store;
pub mod traced;

pub use channel::{
    expired_channel, ChannelError, Message, MessageReceiver, MessageSender, NotificationChannel,
};
pub use memory::{MemoryChannel, MemoryServer, MemoryStore};
pub use store::{Store, StoreError};
pub use traced::{TracedChannel, TracedStore};

#[cfg(feature = "redis")]
pub use crate::redis::{RedisChannel, RedisStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeStore, StoreCall};
