// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fan-out of one expiry notification to its handlers

use crate::handler::{invoke, Handler, HandlerError};
use tracing::{error, trace};

/// Outcome of dispatching one expired key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub key: String,
    /// Handlers run, including the ones that failed
    pub invoked: usize,
    pub failed: Vec<HandlerError>,
}

impl DispatchReport {
    /// True when every handler returned `Ok`
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run each handler once, in order.
///
/// A failing handler is recorded and the remaining handlers still run.
pub(crate) fn run(key: &str, handlers: &[Handler]) -> DispatchReport {
    trace!(key, handlers = handlers.len(), "dispatching expiry");

    let mut failed = Vec::new();
    for (index, handler) in handlers.iter().enumerate() {
        if let Err(e) = invoke(handler, index, key) {
            error!(key, index, error = %e, "expiry handler failed");
            failed.push(e);
        }
    }

    DispatchReport {
        key: key.to_string(),
        invoked: handlers.len(),
        failed,
    }
}
