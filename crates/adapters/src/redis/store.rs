// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::redact_url;
use crate::store::{Store, StoreError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Redis-backed store using a multiplexed `ConnectionManager`
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    closed: Arc<AtomicBool>,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("connection", &"ConnectionManager")
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish()
    }
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(|e| {
            StoreError::Connection(format!("invalid Redis URL {}: {}", redact_url(url), e))
        })?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("failed to connect to Redis: {}", e)))?;

        debug!(url = %redact_url(url), "redis store connected");

        Ok(Self {
            connection,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    fn connection(&self) -> Result<ConnectionManager, StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        Ok(self.connection.clone())
    }
}

fn command_failed(command: &str, error: redis::RedisError) -> StoreError {
    if error.is_connection_dropped() || error.is_io_error() {
        StoreError::Connection(format!("Redis {} failed: {}", command, error))
    } else {
        StoreError::Command(format!("Redis {} failed: {}", command, error))
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn set_with_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let _reply: redis::Value = redis::cmd("SET")
            .arg(key)
            .arg("")
            .arg("PX")
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(|e| command_failed("SET", e))?;

        debug!(key, ttl_ms, "redis SET PX");
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection()?;
        let exists: bool = redis::cmd("EXISTS")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| command_failed("EXISTS", e))?;
        Ok(exists)
    }

    async fn refresh_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let updated: i64 = redis::cmd("PEXPIRE")
            .arg(key)
            .arg(ttl_ms)
            .query_async(&mut conn)
            .await
            .map_err(|e| command_failed("PEXPIRE", e))?;

        debug!(key, ttl_ms, updated = updated == 1, "redis PEXPIRE");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.connection()?;
        let removed: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| command_failed("DEL", e))?;

        debug!(key, removed, "redis DEL");
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        // The manager's socket is released once the last clone is dropped
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
