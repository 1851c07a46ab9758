// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lapse loop` - re-schedule a key every time it fires

use super::{announcing, wait_fired};
use anyhow::Result;
use clap::Args;
use lapse_adapters::{NotificationChannel, Store};
use lapse_engine::{CancelOptions, Clock, ScheduleOptions, Scheduler};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Args)]
pub struct LoopArgs {
    #[arg(long, default_value = "loop")]
    pub key: String,

    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub ttl: Duration,

    /// Stop after this many firings (0 runs until interrupted)
    #[arg(long, default_value_t = 0)]
    pub iterations: u64,
}

pub(crate) async fn handle<S, N, C>(scheduler: &Scheduler<S, N, C>, args: LoopArgs) -> Result<()>
where
    S: Store,
    N: NotificationChannel,
    C: Clock,
{
    let (tx, mut fired) = mpsc::unbounded_channel();
    let mut completed = 0u64;

    loop {
        scheduler
            .schedule(
                ScheduleOptions::new(&args.key)
                    .ttl(args.ttl)
                    .handler(announcing("run callback for keyword:", tx.clone())),
            )
            .await?;
        println!("scheduled successfully!");

        let key = wait_fired(&mut fired, args.ttl).await?;
        completed += 1;
        if args.iterations != 0 && completed >= args.iterations {
            return Ok(());
        }

        // Drop this round's handler before registering the next one
        scheduler.cancel(CancelOptions::new(key)).await?;
    }
}
