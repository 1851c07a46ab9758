// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lapse simple` - schedule one key and wait for it

use super::{announcing, wait_fired};
use anyhow::Result;
use clap::Args;
use lapse_adapters::{NotificationChannel, Store};
use lapse_engine::{Clock, ScheduleOptions, Scheduler};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Args)]
pub struct SimpleArgs {
    #[arg(long, default_value = "keyword")]
    pub key: String,

    /// Time until the key expires (e.g. 50ms, 3s)
    #[arg(long, default_value = "3s", value_parser = humantime::parse_duration)]
    pub ttl: Duration,
}

pub(crate) async fn handle<S, N, C>(scheduler: &Scheduler<S, N, C>, args: SimpleArgs) -> Result<()>
where
    S: Store,
    N: NotificationChannel,
    C: Clock,
{
    let (tx, mut fired) = mpsc::unbounded_channel();

    scheduler
        .schedule(
            ScheduleOptions::new(&args.key)
                .ttl(args.ttl)
                .handler(announcing("run callback for keyword:", tx)),
        )
        .await?;
    println!("scheduled successfully!");

    wait_fired(&mut fired, args.ttl).await?;
    Ok(())
}
