// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling engine
//!
//! Keys are scheduled on the store with a TTL; handlers live in an in-process
//! registry. When the store reports an expired key, the registry is read at
//! that moment and every matching handler runs on the listener task.

use crate::config::SchedulerConfig;
use crate::dispatch::{self, DispatchReport};
use crate::error::SchedulerError;
use crate::event::{ClientRole, ConnectionStatus, SchedulerEvent};
use crate::handler::Handler;
use crate::listener::Listener;
use crate::options::{CancelOptions, HandlerOptions, RescheduleOptions, ScheduleOptions};
use lapse_adapters::{ChannelError, NotificationChannel, Store, StoreError};
use lapse_core::validate::require_key;
use lapse_core::{Clock, HandlerRegistry, Ttl, ValidationError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const EVENT_CAPACITY: usize = 256;

/// Delayed-event scheduler over a TTL store and its expiry notifications.
///
/// Cloning yields another handle onto the same engine; `end()` on any handle
/// ends all of them.
pub struct Scheduler<S, N, C> {
    shared: Arc<Shared<S, N, C>>,
}

impl<S, N, C> Clone for Scheduler<S, N, C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

struct Shared<S, N, C> {
    store: S,
    channel: N,
    clock: C,
    expiry_channel: String,
    registry: Mutex<HandlerRegistry<Handler>>,
    events: broadcast::Sender<SchedulerEvent>,
    statuses: Mutex<HashMap<ClientRole, ConnectionStatus>>,
    listener: Mutex<Option<Listener>>,
    ended: AtomicBool,
}

impl<S, N, C> Scheduler<S, N, C>
where
    S: Store,
    N: NotificationChannel,
    C: Clock,
{
    /// Subscribe to the expiry channel and start listening
    pub async fn start(
        store: S,
        channel: N,
        clock: C,
        config: &SchedulerConfig,
    ) -> Result<Self, SchedulerError> {
        let expiry_channel = config.expiry_channel();
        let messages = channel.subscribe(&expiry_channel).await?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let shared = Arc::new(Shared {
            store,
            channel,
            clock,
            expiry_channel: expiry_channel.clone(),
            registry: Mutex::new(HandlerRegistry::new()),
            events,
            statuses: Mutex::new(HashMap::new()),
            listener: Mutex::new(None),
            ended: AtomicBool::new(false),
        });
        shared.set_status(ClientRole::Scheduler, ConnectionStatus::Ready);
        shared.set_status(ClientRole::Listener, ConnectionStatus::Ready);

        let on_expired = {
            let weak = Arc::downgrade(&shared);
            move |key: &str| {
                if let Some(shared) = Weak::upgrade(&weak) {
                    shared.on_expire(key);
                }
            }
        };
        let on_lost = {
            let weak = Arc::downgrade(&shared);
            move || {
                if let Some(shared) = Weak::upgrade(&weak) {
                    shared.listener_lost();
                }
            }
        };
        let listener = Listener::spawn(messages, expiry_channel.clone(), on_expired, on_lost);
        *lock(&shared.listener) = Some(listener);

        info!(channel = %expiry_channel, "scheduler started");
        Ok(Self { shared })
    }

    /// Schedule a key, register a handler for it, or both.
    ///
    /// With a TTL, an existing key has its expiry refreshed and a missing key
    /// is created with an empty payload. Without one the store is untouched.
    pub async fn schedule(&self, options: ScheduleOptions) -> Result<(), SchedulerError> {
        self.ensure_active()?;
        let ScheduleOptions {
            key,
            ttl,
            handler,
            pattern,
        } = options;
        require_key("schedule", &key)?;

        if let Some(handler) = handler {
            self.shared.register(&key, handler, pattern)?;
        }
        if let Some(ttl) = ttl {
            self.set_expiry(&key, ttl).await?;
        }
        Ok(())
    }

    /// Move the expiry of a key to `ttl` from now; handlers are kept
    pub async fn reschedule(&self, options: RescheduleOptions) -> Result<(), SchedulerError> {
        self.ensure_active()?;
        require_key("reschedule", &options.key)?;
        let ttl = options
            .ttl
            .ok_or(ValidationError::MissingTtl { op: "reschedule" })?;

        self.schedule(ScheduleOptions {
            key: options.key,
            ttl: Some(ttl),
            handler: None,
            pattern: false,
        })
        .await
    }

    /// Register a handler without touching the store
    pub fn add_handler(&self, options: HandlerOptions) -> Result<(), SchedulerError> {
        self.ensure_active()?;
        let HandlerOptions {
            key,
            handler,
            pattern,
        } = options;
        require_key("add_handler", &key)?;
        let handler = handler.ok_or(ValidationError::MissingHandler { op: "add_handler" })?;

        self.shared.register(&key, handler, pattern)?;
        Ok(())
    }

    /// Delete a key and forget every handler registered under that name.
    ///
    /// Both the exact list for the key and a pattern whose source is the same
    /// string are dropped, whether or not the store still held the key.
    ///
    /// Best-effort: a notification already in flight when the key is deleted
    /// may still arrive and be dispatched to handlers registered afterwards.
    pub async fn cancel(&self, options: CancelOptions) -> Result<(), SchedulerError> {
        self.ensure_active()?;
        let key = options.key;
        require_key("cancel", &key)?;

        let deleted = self.shared.store.delete(&key).await;
        {
            let mut registry = self.shared.registry();
            registry.remove_exact(&key);
            registry.remove_pattern(&key);
        }
        debug!(key, "cancelled");

        deleted.map_err(|e| self.shared.store_failed(e))
    }

    /// Run every handler for an expired key.
    ///
    /// Called by the listener for each notification; exposed so a key can be
    /// dispatched without waiting on the store.
    pub fn on_expire(&self, key: &str) -> DispatchReport {
        self.shared.on_expire(key)
    }

    /// Clear the registry, stop listening and release both connections.
    ///
    /// Idempotent. Every later operation fails with `SchedulerError::Ended`.
    /// All teardown steps are attempted; the first failure is returned.
    pub async fn end(&self) -> Result<(), SchedulerError> {
        if self.shared.ended.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        self.shared.registry().reset_all();

        let listener = lock(&self.shared.listener).take();
        if let Some(listener) = listener {
            listener.stop().await;
        }

        let mut first_error: Option<SchedulerError> = None;
        if let Err(e) = self
            .shared
            .channel
            .unsubscribe(&self.shared.expiry_channel)
            .await
        {
            warn!(error = %e, "unsubscribe failed during shutdown");
            first_error.get_or_insert(e.into());
        }
        if let Err(e) = self.shared.channel.close().await {
            warn!(error = %e, "closing listener connection failed");
            first_error.get_or_insert(e.into());
        }
        if let Err(e) = self.shared.store.close().await {
            warn!(error = %e, "closing scheduler connection failed");
            first_error.get_or_insert(e.into());
        }

        self.shared
            .set_status(ClientRole::Listener, ConnectionStatus::Closed);
        self.shared
            .set_status(ClientRole::Scheduler, ConnectionStatus::Closed);
        info!("scheduler ended");

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Subscribe to status changes and failures
    pub fn events(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.shared.events.subscribe()
    }

    /// Last known status of a connection
    pub fn status(&self, client: ClientRole) -> ConnectionStatus {
        lock(&self.shared.statuses)
            .get(&client)
            .copied()
            .unwrap_or(ConnectionStatus::Disconnected)
    }

    pub fn is_ended(&self) -> bool {
        self.shared.ended.load(Ordering::SeqCst)
    }

    /// Channel the listener is subscribed to
    pub fn expiry_channel(&self) -> &str {
        &self.shared.expiry_channel
    }

    /// Number of handlers registered for an exact key
    pub fn exact_handlers(&self, key: &str) -> usize {
        self.shared.registry().exact_count(key)
    }

    /// Number of handlers registered for a pattern source
    pub fn pattern_handlers(&self, source: &str) -> usize {
        self.shared.registry().pattern_count(source)
    }

    fn ensure_active(&self) -> Result<(), SchedulerError> {
        if self.is_ended() {
            return Err(SchedulerError::Ended);
        }
        Ok(())
    }

    async fn set_expiry(&self, key: &str, ttl: Ttl) -> Result<(), SchedulerError> {
        let ttl_ms = ttl.remaining_millis(self.shared.clock.now());
        let store = &self.shared.store;

        let exists = store
            .exists(key)
            .await
            .map_err(|e| self.shared.store_failed(e))?;
        if exists {
            store
                .refresh_ttl(key, ttl_ms)
                .await
                .map_err(|e| self.shared.store_failed(e))?;
            debug!(key, ttl_ms, "expiry refreshed");
        } else {
            store
                .set_with_ttl(key, ttl_ms)
                .await
                .map_err(|e| self.shared.store_failed(e))?;
            debug!(key, ttl_ms, "expiry set");
        }
        Ok(())
    }
}

impl<S, N, C> Shared<S, N, C> {
    fn registry(&self) -> MutexGuard<'_, HandlerRegistry<Handler>> {
        lock(&self.registry)
    }

    fn register(&self, key: &str, handler: Handler, pattern: bool) -> Result<(), ValidationError> {
        let mut registry = self.registry();
        if pattern {
            registry.add_pattern(key, handler)?;
        } else {
            registry.add_exact(key, handler);
        }
        debug!(key, pattern, "handler registered");
        Ok(())
    }

    fn on_expire(&self, key: &str) -> DispatchReport {
        // Handlers run without the lock so they may register or cancel
        let handlers = self.registry().dispatch(key);
        let report = dispatch::run(key, &handlers);

        for error in &report.failed {
            self.emit(SchedulerEvent::HandlerFailed(error.clone()));
        }
        report
    }

    fn listener_lost(&self) {
        if self.ended.load(Ordering::SeqCst) {
            return;
        }
        self.set_status(ClientRole::Listener, ConnectionStatus::Disconnected);
        self.emit(SchedulerEvent::Error(SchedulerError::Channel(
            ChannelError::Connection("expiry notification stream ended".to_string()),
        )));
    }

    /// Wrap a store failure, announcing it when the connection itself failed
    fn store_failed(&self, error: StoreError) -> SchedulerError {
        if let StoreError::Connection(_) = &error {
            self.set_status(ClientRole::Scheduler, ConnectionStatus::Disconnected);
            self.emit(SchedulerEvent::Error(SchedulerError::Store(error.clone())));
        }
        SchedulerError::Store(error)
    }

    fn set_status(&self, client: ClientRole, status: ConnectionStatus) {
        let previous = lock(&self.statuses).insert(client, status);
        if previous != Some(status) {
            info!(%client, %status, "connection status");
            self.emit(SchedulerEvent::Status { client, status });
        }
    }

    fn emit(&self, event: SchedulerEvent) {
        // No receivers is fine
        let _ = self.events.send(event);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
