// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument validation errors shared by the scheduling operations

use crate::pattern::PatternError;
use thiserror::Error;

/// An operation was called with missing or malformed arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{op}: key is required")]
    MissingKey { op: &'static str },
    #[error("{op}: ttl is required")]
    MissingTtl { op: &'static str },
    #[error("{op}: handler is required")]
    MissingHandler { op: &'static str },
    #[error(transparent)]
    InvalidPattern(#[from] PatternError),
}

/// Require a non-empty key
pub fn require_key(op: &'static str, key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::MissingKey { op });
    }
    Ok(())
}
