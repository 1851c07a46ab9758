// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Store, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    SetWithTtl { key: String, ttl_ms: i64 },
    Exists { key: String },
    RefreshTtl { key: String, ttl_ms: i64 },
    Delete { key: String },
    Close,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<StoreCall>,
    /// Stored keys and their last requested TTL
    keys: HashMap<String, i64>,
    fail_with: Option<StoreError>,
}

/// Fake store that records calls and never expires anything on its own
#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<FakeState>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// Seed a key as already stored
    pub fn insert_key(&self, key: &str, ttl_ms: i64) {
        self.lock().keys.insert(key.to_string(), ttl_ms);
    }

    /// Last TTL requested for a stored key
    pub fn ttl_of(&self, key: &str) -> Option<i64> {
        self.lock().keys.get(key).copied()
    }

    /// Make every subsequent call fail with `error` (None restores success)
    pub fn set_failure(&self, error: Option<StoreError>) {
        self.lock().fail_with = error;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: StoreCall) -> Result<std::sync::MutexGuard<'_, FakeState>, StoreError> {
        let mut state = self.lock();
        state.calls.push(call);
        match &state.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl Store for FakeStore {
    async fn set_with_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError> {
        let mut state = self.record(StoreCall::SetWithTtl {
            key: key.to_string(),
            ttl_ms,
        })?;
        state.keys.insert(key.to_string(), ttl_ms);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let state = self.record(StoreCall::Exists {
            key: key.to_string(),
        })?;
        Ok(state.keys.contains_key(key))
    }

    async fn refresh_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError> {
        let mut state = self.record(StoreCall::RefreshTtl {
            key: key.to_string(),
            ttl_ms,
        })?;
        if let Some(ttl) = state.keys.get_mut(key) {
            *ttl = ttl_ms;
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut state = self.record(StoreCall::Delete {
            key: key.to_string(),
        })?;
        state.keys.remove(key);
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        let _state = self.record(StoreCall::Close)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
