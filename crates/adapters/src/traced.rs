// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::channel::{ChannelError, MessageReceiver, NotificationChannel};
use crate::store::{Store, StoreError};
use async_trait::async_trait;
use tracing::Instrument;

/// Wrapper that adds tracing to any Store
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: Store> Store for TracedStore<S> {
    async fn set_with_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.set_with_ttl", key, ttl_ms);
        async move {
            if ttl_ms <= 0 {
                tracing::debug!("ttl already lapsed, store decides");
            }

            let start = std::time::Instant::now();
            let result = self.inner.set_with_ttl(key, ttl_ms).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(()) => tracing::debug!(elapsed_ms = elapsed.as_millis() as u64, "key set"),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "set failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let result = self.inner.exists(key).await;
        tracing::trace!(key, exists = ?result.as_ref().ok(), "checked");
        result
    }

    async fn refresh_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.refresh_ttl", key, ttl_ms);
        async move {
            let result = self.inner.refresh_ttl(key, ttl_ms).await;
            match &result {
                Ok(()) => tracing::debug!("expiry refreshed"),
                Err(e) => tracing::error!(error = %e, "refresh failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.delete", key);
        async move {
            let result = self.inner.delete(key).await;
            match &result {
                Ok(()) => tracing::debug!("deleted"),
                Err(e) => tracing::error!(error = %e, "delete failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn close(&self) -> Result<(), StoreError> {
        let result = self.inner.close().await;
        match &result {
            Ok(()) => tracing::info!("store connection closed"),
            // close() failing is usually a connection that is already gone
            Err(e) => tracing::warn!(error = %e, "store close failed (may be expected)"),
        }
        result
    }
}

/// Wrapper that adds tracing to any NotificationChannel
#[derive(Clone)]
pub struct TracedChannel<N> {
    inner: N,
}

impl<N> TracedChannel<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<N: NotificationChannel> NotificationChannel for TracedChannel<N> {
    async fn subscribe(&self, channel: &str) -> Result<MessageReceiver, ChannelError> {
        let span = tracing::info_span!("channel.subscribe", channel);
        async move {
            let result = self.inner.subscribe(channel).await;
            match &result {
                Ok(_) => tracing::info!("subscribed"),
                Err(e) => tracing::error!(error = %e, "subscribe failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), ChannelError> {
        let span = tracing::info_span!("channel.unsubscribe", channel);
        async move {
            let result = self.inner.unsubscribe(channel).await;
            match &result {
                Ok(()) => tracing::info!("unsubscribed"),
                Err(e) => tracing::warn!(error = %e, "unsubscribe failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn close(&self) -> Result<(), ChannelError> {
        let result = self.inner.close().await;
        match &result {
            Ok(()) => tracing::info!("channel connection closed"),
            Err(e) => tracing::warn!(error = %e, "channel close failed (may be expected)"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
