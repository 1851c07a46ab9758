// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Background task draining the expiry channel

use lapse_adapters::MessageReceiver;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Why the listener loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ListenerExit {
    /// `stop()` was called
    Shutdown,
    /// The message stream ended underneath us
    StreamEnded,
}

/// Handle to a running listener task
pub(crate) struct Listener {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<ListenerExit>,
}

impl Listener {
    /// Spawn the listener.
    ///
    /// `on_expired` runs on the listener task for every message on `channel`,
    /// one at a time. `on_lost` runs once if the stream ends without `stop()`.
    pub(crate) fn spawn<F, L>(
        mut messages: MessageReceiver,
        channel: String,
        on_expired: F,
        on_lost: L,
    ) -> Self
    where
        F: Fn(&str) + Send + 'static,
        L: FnOnce() + Send + 'static,
    {
        let (shutdown, mut shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => return ListenerExit::Shutdown,
                    message = messages.recv() => match message {
                        Some(message) if message.channel == channel => {
                            on_expired(&message.payload);
                        }
                        Some(message) => {
                            trace!(channel = %message.channel, "ignoring message on foreign channel");
                        }
                        None => {
                            warn!(%channel, "expiry notification stream ended");
                            on_lost();
                            return ListenerExit::StreamEnded;
                        }
                    },
                }
            }
        });

        Self { shutdown, task }
    }

    /// Stop the loop and wait for it to finish
    pub(crate) async fn stop(self) -> ListenerExit {
        // The task may already have exited on its own
        let _ = self.shutdown.send(());
        match self.task.await {
            Ok(exit) => {
                debug!(?exit, "listener stopped");
                exit
            }
            Err(e) => {
                warn!(error = %e, "listener task did not finish cleanly");
                ListenerExit::Shutdown
            }
        }
    }
}
