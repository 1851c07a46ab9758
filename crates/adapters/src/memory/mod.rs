// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process store and notification channel.
//!
//! `MemoryServer` plays the role of the external server: it owns the
//! keyspace, runs one tokio timer per key, and publishes
//! `__keyevent@<db>__:expired` when a timer lapses. `MemoryStore` and
//! `MemoryChannel` are connection handles onto it; closing a handle does not
//! cancel expiries already scheduled on the server.

use crate::channel::{
    expired_channel, ChannelError, Message, MessageReceiver, MessageSender, NotificationChannel,
};
use crate::store::{Store, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

struct Entry {
    /// Bumped on every set/refresh so a superseded timer cannot expire the key
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct Keyspace {
    entries: HashMap<String, Entry>,
    next_generation: u64,
}

struct Subscriber {
    handle: u64,
    tx: MessageSender,
}

#[derive(Default)]
struct Hub {
    channels: HashMap<String, Vec<Subscriber>>,
}

/// In-process stand-in for the external key-value server
#[derive(Clone)]
pub struct MemoryServer {
    db: u32,
    keyspace: Arc<Mutex<Keyspace>>,
    hub: Arc<Mutex<Hub>>,
    next_handle: Arc<AtomicU64>,
}

impl Default for MemoryServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryServer {
    pub fn new() -> Self {
        Self::with_db(0)
    }

    /// Create a server whose expiry events are published for `db`
    pub fn with_db(db: u32) -> Self {
        Self {
            db,
            keyspace: Arc::new(Mutex::new(Keyspace::default())),
            hub: Arc::new(Mutex::new(Hub::default())),
            next_handle: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Open a store connection
    pub fn store(&self) -> MemoryStore {
        MemoryStore {
            server: self.clone(),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Open a pub/sub connection
    pub fn channel(&self) -> MemoryChannel {
        MemoryChannel {
            server: self.clone(),
            handle: self.next_handle.fetch_add(1, Ordering::SeqCst),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check whether a key is pending expiry
    pub fn contains(&self, key: &str) -> bool {
        self.keyspace().entries.contains_key(key)
    }

    /// Number of keys pending expiry
    pub fn len(&self) -> usize {
        self.keyspace().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Publish a message to every subscriber of `channel`.
    ///
    /// Returns the number of subscribers that received it.
    pub fn publish(&self, channel: &str, payload: &str) -> usize {
        let mut hub = self.hub.lock().unwrap_or_else(|e| e.into_inner());
        let Some(subscribers) = hub.channels.get_mut(channel) else {
            return 0;
        };

        let message = Message {
            channel: channel.to_string(),
            payload: payload.to_string(),
        };
        subscribers.retain(|sub| sub.tx.send(message.clone()).is_ok());
        subscribers.len()
    }

    fn keyspace(&self) -> std::sync::MutexGuard<'_, Keyspace> {
        self.keyspace.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start (or restart) the expiry timer for a key
    fn arm(&self, key: &str, ttl_ms: i64) {
        let mut keyspace = self.keyspace();
        self.arm_locked(&mut keyspace, key, ttl_ms);
    }

    /// Restart the expiry timer only if the key is still pending.
    ///
    /// The check and the re-arm share one keyspace guard, so a timer that
    /// lapses concurrently either wins (and the key stays gone) or is
    /// superseded.
    fn rearm_if_present(&self, key: &str, ttl_ms: i64) -> bool {
        let mut keyspace = self.keyspace();
        if !keyspace.entries.contains_key(key) {
            return false;
        }
        self.arm_locked(&mut keyspace, key, ttl_ms);
        true
    }

    fn arm_locked(&self, keyspace: &mut Keyspace, key: &str, ttl_ms: i64) {
        keyspace.next_generation += 1;
        let generation = keyspace.next_generation;

        if let Some(previous) = keyspace.entries.remove(key) {
            previous.timer.abort();
        }

        let server = self.clone();
        let owned_key = key.to_string();
        let timer = tokio::spawn(async move {
            // Zero or negative TTLs lapse right away
            if let Ok(ms) = u64::try_from(ttl_ms) {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            server.expire(&owned_key, generation);
        });

        keyspace
            .entries
            .insert(key.to_string(), Entry { generation, timer });
    }

    fn expire(&self, key: &str, generation: u64) {
        let expired = {
            let mut keyspace = self.keyspace();
            match keyspace.entries.get(key) {
                Some(entry) if entry.generation == generation => {
                    keyspace.entries.remove(key);
                    true
                }
                _ => false,
            }
        };

        if expired {
            let delivered = self.publish(&expired_channel(self.db), key);
            tracing::trace!(key, delivered, "key expired");
        }
    }

    fn remove(&self, key: &str) {
        if let Some(entry) = self.keyspace().entries.remove(key) {
            entry.timer.abort();
        }
    }

    fn subscribe(&self, handle: u64, channel: &str) -> MessageReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut hub = self.hub.lock().unwrap_or_else(|e| e.into_inner());
        hub.channels
            .entry(channel.to_string())
            .or_default()
            .push(Subscriber { handle, tx });
        rx
    }

    fn unsubscribe(&self, handle: u64, channel: Option<&str>) {
        let mut hub = self.hub.lock().unwrap_or_else(|e| e.into_inner());
        for (name, subscribers) in hub.channels.iter_mut() {
            let selected = match channel {
                Some(c) => c == name,
                None => true,
            };
            if selected {
                subscribers.retain(|sub| sub.handle != handle);
            }
        }
        hub.channels.retain(|_, subscribers| !subscribers.is_empty());
    }
}

/// Store connection onto a `MemoryServer`
#[derive(Clone)]
pub struct MemoryStore {
    server: MemoryServer,
    closed: Arc<AtomicBool>,
}

impl MemoryStore {
    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(StoreError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn set_with_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.server.arm(key, ttl_ms);
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.ensure_open()?;
        Ok(self.server.contains(key))
    }

    async fn refresh_ttl(&self, key: &str, ttl_ms: i64) -> Result<(), StoreError> {
        self.ensure_open()?;
        // Like PEXPIRE: refreshing a key that is gone does nothing
        self.server.rearm_if_present(key, ttl_ms);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.server.remove(key);
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Pub/sub connection onto a `MemoryServer`
#[derive(Clone)]
pub struct MemoryChannel {
    server: MemoryServer,
    handle: u64,
    closed: Arc<AtomicBool>,
}

impl MemoryChannel {
    fn ensure_open(&self) -> Result<(), ChannelError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ChannelError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    async fn subscribe(&self, channel: &str) -> Result<MessageReceiver, ChannelError> {
        self.ensure_open()?;
        Ok(self.server.subscribe(self.handle, channel))
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), ChannelError> {
        self.ensure_open()?;
        self.server.unsubscribe(self.handle, Some(channel));
        Ok(())
    }

    async fn close(&self) -> Result<(), ChannelError> {
        self.closed.store(true, Ordering::SeqCst);
        self.server.unsubscribe(self.handle, None);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
