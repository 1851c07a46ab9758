// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the scheduling engine

use lapse_adapters::{ChannelError, StoreError};
use lapse_core::ValidationError;
use thiserror::Error;

/// Errors returned by scheduling operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
    #[error("scheduler has ended")]
    Ended,
}
