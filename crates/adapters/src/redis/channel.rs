// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::redact_url;
use crate::channel::{ChannelError, Message, MessageReceiver, MessageSender, NotificationChannel};
use async_trait::async_trait;
use futures_util::StreamExt;
use redis::aio::PubSub;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

enum Command {
    Subscribe {
        channel: String,
        tx: MessageSender,
        reply: oneshot::Sender<Result<(), ChannelError>>,
    },
    Unsubscribe {
        channel: String,
        reply: oneshot::Sender<Result<(), ChannelError>>,
    },
    Close,
}

/// Redis pub/sub connection.
///
/// A background task owns the `PubSub` connection; subscribe and unsubscribe
/// requests are sent to it so message delivery never waits on a caller.
#[derive(Clone)]
pub struct RedisChannel {
    commands: mpsc::UnboundedSender<Command>,
}

impl RedisChannel {
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let client = redis::Client::open(url).map_err(|e| {
            ChannelError::Connection(format!("invalid Redis URL {}: {}", redact_url(url), e))
        })?;
        let pubsub = client
            .get_async_pubsub()
            .await
            .map_err(|e| ChannelError::Connection(format!("failed to connect to Redis: {}", e)))?;

        debug!(url = %redact_url(url), "redis pubsub connected");

        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(pubsub, rx));
        Ok(Self { commands })
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<(), ChannelError>>) -> Command,
    ) -> Result<(), ChannelError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .map_err(|_| ChannelError::Closed)?;
        response.await.map_err(|_| ChannelError::Closed)?
    }
}

#[async_trait]
impl NotificationChannel for RedisChannel {
    async fn subscribe(&self, channel: &str) -> Result<MessageReceiver, ChannelError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.request(|reply| Command::Subscribe {
            channel: channel.to_string(),
            tx,
            reply,
        })
        .await?;
        Ok(rx)
    }

    async fn unsubscribe(&self, channel: &str) -> Result<(), ChannelError> {
        self.request(|reply| Command::Unsubscribe {
            channel: channel.to_string(),
            reply,
        })
        .await
    }

    async fn close(&self) -> Result<(), ChannelError> {
        // Already stopped is as good as closed
        let _ = self.commands.send(Command::Close);
        Ok(())
    }
}

/// Drive the pub/sub connection until closed or disconnected
async fn run(mut pubsub: PubSub, mut commands: mpsc::UnboundedReceiver<Command>) {
    let mut subscribers: HashMap<String, Vec<MessageSender>> = HashMap::new();

    loop {
        // The message stream borrows the connection, so it is rebuilt after
        // each command is applied
        let command = {
            let mut messages = std::pin::pin!(pubsub.on_message());
            loop {
                tokio::select! {
                    msg = messages.next() => match msg {
                        Some(msg) => forward(&mut subscribers, &msg),
                        None => {
                            warn!("redis pubsub connection lost");
                            return;
                        }
                    },
                    command = commands.recv() => break command,
                }
            }
        };

        match command {
            Some(Command::Subscribe { channel, tx, reply }) => {
                let result = pubsub
                    .subscribe(&channel)
                    .await
                    .map_err(|e| ChannelError::Subscribe {
                        channel: channel.clone(),
                        reason: e.to_string(),
                    });
                if result.is_ok() {
                    subscribers.entry(channel).or_default().push(tx);
                }
                let _ = reply.send(result);
            }
            Some(Command::Unsubscribe { channel, reply }) => {
                let result = pubsub
                    .unsubscribe(&channel)
                    .await
                    .map_err(|e| ChannelError::Connection(e.to_string()));
                subscribers.remove(&channel);
                let _ = reply.send(result);
            }
            Some(Command::Close) | None => {
                debug!("redis pubsub closed");
                return;
            }
        }
    }
}

fn forward(subscribers: &mut HashMap<String, Vec<MessageSender>>, msg: &redis::Msg) {
    let channel = msg.get_channel_name();
    let Some(senders) = subscribers.get_mut(channel) else {
        return;
    };

    let payload: String = match msg.get_payload() {
        Ok(payload) => payload,
        Err(e) => {
            warn!(channel, error = %e, "dropping non-string pubsub payload");
            return;
        }
    };

    let message = Message {
        channel: channel.to_string(),
        payload,
    };
    senders.retain(|tx| tx.send(message.clone()).is_ok());
}
