// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish/subscribe channel carrying key-expiry notifications

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

/// A message delivered on a subscribed channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Channel the message was published on
    pub channel: String,
    /// For expiry notifications, the literal name of the expired key
    pub payload: String,
}

/// Sender half of a subscription
pub type MessageSender = mpsc::UnboundedSender<Message>;
/// Receiver half of a subscription; ends when the subscription goes away
pub type MessageReceiver = mpsc::UnboundedReceiver<Message>;

/// Errors from channel operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("subscribe to {channel} failed: {reason}")]
    Subscribe { channel: String, reason: String },
    #[error("channel connection failed: {0}")]
    Connection(String),
    #[error("channel connection closed")]
    Closed,
}

/// Adapter for the store's notification channel
#[async_trait]
pub trait NotificationChannel: Clone + Send + Sync + 'static {
    /// Subscribe to a channel, returning the stream of its messages
    async fn subscribe(&self, channel: &str) -> Result<MessageReceiver, ChannelError>;

    /// Stop delivery for a channel; its receivers end
    async fn unsubscribe(&self, channel: &str) -> Result<(), ChannelError>;

    /// Release the connection
    async fn close(&self) -> Result<(), ChannelError>;
}

/// Channel on which the store announces expired keys for a logical database
pub fn expired_channel(db: u32) -> String {
    format!("__keyevent@{}__:expired", db)
}
