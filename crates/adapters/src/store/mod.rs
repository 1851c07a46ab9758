// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value store with per-key expiry

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store command failed: {0}")]
    Command(String),
    #[error("store connection failed: {0}")]
    Connection(String),
    #[error("store connection closed")]
    Closed,
}

/// The store that holds scheduled keys.
///
/// Keys carry an empty payload; only their remaining time matters. TTLs are
/// milliseconds and may be zero or negative, in which case the store decides
/// whether the key lapses immediately or the command is rejected.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    /// Create or overwrite a key that expires after `ttl_ms`
    async fn set_with_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError>;

    /// Check whether a key is currently stored
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Update the expiry of an existing key without touching its payload
    async fn refresh_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError>;

    /// Delete a key; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Release the connection
    async fn close(&self) -> Result<(), StoreError>;
}
