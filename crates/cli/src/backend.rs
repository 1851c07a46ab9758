// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend selection and scheduler construction

use crate::commands;
use crate::Commands;
use anyhow::Result;
use clap::ValueEnum;
use lapse_adapters::{MemoryServer, TracedChannel, TracedStore};
use lapse_engine::{Scheduler, SchedulerConfig, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// In-process keyspace; nothing outlives the command
    Memory,
    /// Redis with keyspace notifications enabled
    Redis,
}

pub(crate) async fn run(backend: Backend, config: &SchedulerConfig, command: Commands) -> Result<()> {
    match backend {
        Backend::Memory => {
            let server = MemoryServer::with_db(config.db);
            let scheduler = Scheduler::start(
                TracedStore::new(server.store()),
                TracedChannel::new(server.channel()),
                SystemClock,
                config,
            )
            .await?;
            commands::run(&scheduler, command).await
        }
        Backend::Redis => run_redis(config, command).await,
    }
}

#[cfg(feature = "redis")]
async fn run_redis(config: &SchedulerConfig, command: Commands) -> Result<()> {
    use lapse_adapters::{RedisChannel, RedisStore};

    let url = config.redis_url();
    let store = RedisStore::connect(&url).await?;
    let channel = RedisChannel::connect(&url).await?;
    let scheduler = Scheduler::start(
        TracedStore::new(store),
        TracedChannel::new(channel),
        SystemClock,
        config,
    )
    .await?;
    commands::run(&scheduler, command).await
}

#[cfg(not(feature = "redis"))]
async fn run_redis(_config: &SchedulerConfig, _command: Commands) -> Result<()> {
    anyhow::bail!("lapse was built without Redis support; rebuild with `--features redis`")
}
