// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `lapse reschedule` - schedule a key, then move its expiry

use super::{announcing, wait_fired};
use anyhow::Result;
use clap::Args;
use lapse_adapters::{NotificationChannel, Store};
use lapse_engine::{Clock, RescheduleOptions, ScheduleOptions, Scheduler};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Args)]
pub struct RescheduleArgs {
    #[arg(long, default_value = "reschedule")]
    pub key: String,

    /// Initial time until expiry
    #[arg(long, default_value = "3s", value_parser = humantime::parse_duration)]
    pub ttl: Duration,

    /// Replacement time until expiry, counted from the reschedule
    #[arg(long, default_value = "5s", value_parser = humantime::parse_duration)]
    pub new_ttl: Duration,
}

pub(crate) async fn handle<S, N, C>(
    scheduler: &Scheduler<S, N, C>,
    args: RescheduleArgs,
) -> Result<()>
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
    println!(
        "the task is scheduled to be run in {}",
        humantime::format_duration(args.ttl)
    );

    scheduler
        .reschedule(RescheduleOptions::new(&args.key, args.new_ttl))
        .await?;
    println!(
        "the task is rescheduled to be run in {}",
        humantime::format_duration(args.new_ttl)
    );

    wait_fired(&mut fired, args.new_ttl).await?;
    Ok(())
}
