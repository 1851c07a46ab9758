// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lapse multi` - two handlers on one key

use super::{announcing, wait_fired};
use anyhow::Result;
use clap::Args;
use lapse_adapters::{NotificationChannel, Store};
use lapse_engine::{Clock, Handler, HandlerOptions, ScheduleOptions, Scheduler};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Args)]
pub struct MultiArgs {
    #[arg(long, default_value = "multi-handlers")]
    pub key: String,

    #[arg(long, default_value = "4s", value_parser = humantime::parse_duration)]
    pub ttl: Duration,
}

pub(crate) async fn handle<S, N, C>(scheduler: &Scheduler<S, N, C>, args: MultiArgs) -> Result<()>
where
    S: Store,
    N: NotificationChannel,
    C: Clock,
{
    let (tx, mut fired) = mpsc::unbounded_channel();

    // Registered first, so it runs first
    scheduler.add_handler(HandlerOptions::new(
        &args.key,
        Handler::new(|_, _| {
            println!("run another callback");
            Ok(())
        }),
    ))?;

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
