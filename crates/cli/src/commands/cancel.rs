// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lapse cancel` - schedule a key, cancel it, confirm nothing fires

use super::announcing;
use anyhow::{bail, Result};
use clap::Args;
use lapse_adapters::{NotificationChannel, Store};
use lapse_engine::{CancelOptions, Clock, ScheduleOptions, Scheduler};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Args)]
pub struct CancelArgs {
    #[arg(long, default_value = "cancelled")]
    pub key: String,

    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    pub ttl: Duration,

    /// How long to watch for a stray firing after the TTL
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration)]
    pub wait: Duration,
}

pub(crate) async fn handle<S, N, C>(scheduler: &Scheduler<S, N, C>, args: CancelArgs) -> Result<()>
where
    S: Store,
    N: NotificationChannel,
    C: Clock,
{
    let (tx, mut fired) = mpsc::unbounded_channel();
    let _watch = tx.clone();

    scheduler
        .schedule(
            ScheduleOptions::new(&args.key)
                .ttl(args.ttl)
                .handler(announcing("run callback for keyword:", tx)),
        )
        .await?;
    println!("scheduled successfully!");

    scheduler
        .cancel(CancelOptions::new(&args.key))
        .await?;
    println!("cancelled {}", args.key);

    match tokio::time::timeout(args.ttl + args.wait, fired.recv()).await {
        Ok(Some(key)) => bail!("handler fired for cancelled key {}", key),
        Ok(None) | Err(_) => {
            println!("no callback fired");
            Ok(())
        }
    }
}
