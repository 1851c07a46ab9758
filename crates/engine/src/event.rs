// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-level notifications: connection status and failures

use crate::error::SchedulerError;
use crate::handler::HandlerError;
use std::fmt;

/// Which of the two store connections an event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientRole {
    /// Connection issuing set/refresh/delete commands
    Scheduler,
    /// Connection subscribed to expiry notifications
    Listener,
}

impl fmt::Display for ClientRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientRole::Scheduler => write!(f, "scheduler"),
            ClientRole::Listener => write!(f, "listener"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Ready,
    /// The connection went away without `end()` being called
    Disconnected,
    /// Released by `end()`
    Closed,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Ready => write!(f, "ready"),
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
            ConnectionStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Broadcast to everyone holding `Scheduler::events()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// A connection changed status
    Status {
        client: ClientRole,
        status: ConnectionStatus,
    },
    /// A handler returned an error or panicked during dispatch
    HandlerFailed(HandlerError),
    /// A connection-level failure outside of any caller's operation
    Error(SchedulerError),
}
