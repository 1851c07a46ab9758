// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection configuration
//!
//! Loaded from TOML, then overridden by `LAPSE_*` environment variables:
//!
//! ```toml
//! host = "redis.internal"
//! port = 6380
//! db = 2
//! password = "hunter2"
//! ```

use lapse_adapters::expired_channel;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Where the store lives and which logical database to watch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub host: String,
    pub port: u16,
    /// Logical database; selects both the keyspace and the expiry channel
    pub db: u32,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            db: 0,
            username: None,
            password: None,
        }
    }
}

impl SchedulerConfig {
    /// Load a TOML config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `LAPSE_HOST`, `LAPSE_PORT`, `LAPSE_DB`, `LAPSE_USERNAME` and
    /// `LAPSE_PASSWORD`
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_vars(|var| std::env::var(var).ok())
    }

    /// Apply overrides from any variable source
    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("LAPSE_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("LAPSE_PORT") {
            self.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "LAPSE_PORT",
                value: port,
            })?;
        }
        if let Some(db) = lookup("LAPSE_DB") {
            self.db = db.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "LAPSE_DB",
                value: db,
            })?;
        }
        if let Some(username) = lookup("LAPSE_USERNAME") {
            self.username = Some(username);
        }
        if let Some(password) = lookup("LAPSE_PASSWORD") {
            self.password = Some(password);
        }
        Ok(self)
    }

    /// Connection URL for the Redis backend; credentials are percent-encoded
    pub fn redis_url(&self) -> String {
        let username = self.username.as_deref().map(urlencoding::encode);
        let password = self.password.as_deref().map(urlencoding::encode);
        let auth = match (username, password) {
            (Some(user), Some(password)) => format!("{}:{}@", user, password),
            (None, Some(password)) => format!(":{}@", password),
            (Some(user), None) => format!("{}@", user),
            (None, None) => String::new(),
        };
        format!("redis://{}{}:{}/{}", auth, self.host, self.port, self.db)
    }

    /// Channel carrying expiry notifications for the configured database
    pub fn expiry_channel(&self) -> String {
        expired_channel(self.db)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
