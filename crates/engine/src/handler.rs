// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expiry handlers

use crate::error::SchedulerError;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// What a handler returns; an `Err` is reported, never propagated
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

type HandlerFn = dyn Fn(Option<&SchedulerError>, &str) -> HandlerResult + Send + Sync;

/// Callback run when a key it is registered for expires.
///
/// Receives an optional error and the expired key; expiry dispatch always
/// passes `None`.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Option<&SchedulerError>, &str) -> HandlerResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, error: Option<&SchedulerError>, key: &str) -> HandlerResult {
        (self.0)(error, key)
    }

    /// Whether both values wrap the same callback
    pub fn same_as(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Handler").field(&Arc::as_ptr(&self.0)).finish()
    }
}

/// A handler failed while processing an expiry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("handler #{index} for {key} failed: {message}")]
    Failed {
        key: String,
        index: usize,
        message: String,
    },
    #[error("handler #{index} for {key} panicked: {message}")]
    Panicked {
        key: String,
        index: usize,
        message: String,
    },
}

impl HandlerError {
    pub fn key(&self) -> &str {
        match self {
            HandlerError::Failed { key, .. } | HandlerError::Panicked { key, .. } => key,
        }
    }
}

/// Run one handler, turning an error or a panic into a `HandlerError`
pub(crate) fn invoke(handler: &Handler, index: usize, key: &str) -> Result<(), HandlerError> {
    match catch_unwind(AssertUnwindSafe(|| handler.call(None, key))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(HandlerError::Failed {
            key: key.to_string(),
            index,
            message: e.to_string(),
        }),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            Err(HandlerError::Panicked {
                key: key.to_string(),
                index,
                message,
            })
        }
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
