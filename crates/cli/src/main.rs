// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! lapse - run keys that call back when their TTL lapses

mod backend;
mod commands;

use anyhow::{Context, Result};
use backend::Backend;
use clap::{Parser, Subcommand};
use commands::{cancel, looping, multi, reschedule, simple};
use lapse_engine::SchedulerConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lapse",
    version,
    about = "lapse - Delayed events on top of store key expiry"
)]
struct Cli {
    /// Config file (defaults to <config dir>/lapse/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Where keys are stored
    #[arg(long, global = true, value_enum, default_value_t = Backend::Memory)]
    backend: Backend,

    #[arg(long, global = true)]
    host: Option<String>,

    #[arg(long, global = true)]
    port: Option<u16>,

    /// Logical database whose expiry events are watched
    #[arg(long, global = true)]
    db: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Schedule a key and wait for its handler
    Simple(simple::SimpleArgs),
    /// Schedule a key, then move its expiry
    Reschedule(reschedule::RescheduleArgs),
    /// Two handlers on one key
    Multi(multi::MultiArgs),
    /// Re-schedule a key every time it fires
    Loop(looping::LoopArgs),
    /// Schedule a key, cancel it, and confirm nothing fires
    Cancel(cancel::CancelArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_deref())?.apply_env()?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(db) = cli.db {
        config.db = db;
    }

    backend::run(cli.backend, &config, cli.command).await
}

fn load_config(explicit: Option<&std::path::Path>) -> Result<SchedulerConfig> {
    if let Some(path) = explicit {
        return SchedulerConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()));
    }

    match dirs::config_dir().map(|dir| dir.join("lapse").join("config.toml")) {
        Some(path) if path.exists() => SchedulerConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display())),
        _ => Ok(SchedulerConfig::default()),
    }
}

fn setup_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
