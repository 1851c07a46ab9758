// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod cancel;
pub mod looping;
pub mod multi;
pub mod reschedule;
pub mod simple;

use crate::Commands;
use anyhow::{anyhow, Result};
use lapse_adapters::{NotificationChannel, Store};
use lapse_engine::{Clock, Handler, Scheduler};
use std::time::Duration;
use tokio::sync::mpsc;

/// Extra time allowed past a TTL before giving up on its handler
const GRACE: Duration = Duration::from_secs(5);

pub(crate) async fn run<S, N, C>(scheduler: &Scheduler<S, N, C>, command: Commands) -> Result<()>
where
    S: Store,
    N: NotificationChannel,
    C: Clock,
{
    let result = match command {
        Commands::Simple(args) => simple::handle(scheduler, args).await,
        Commands::Reschedule(args) => reschedule::handle(scheduler, args).await,
        Commands::Multi(args) => multi::handle(scheduler, args).await,
        Commands::Loop(args) => looping::handle(scheduler, args).await,
        Commands::Cancel(args) => cancel::handle(scheduler, args).await,
    };

    // Release the connections even when the command failed
    scheduler.end().await?;
    result
}

/// Handler that prints `line` followed by the key, then reports the firing
pub(crate) fn announcing(line: &'static str, fired: mpsc::UnboundedSender<String>) -> Handler {
    Handler::new(move |_, key| {
        println!("{} {}", line, key);
        fired.send(key.to_string())?;
        Ok(())
    })
}

/// Wait for the next firing, failing after `limit`
pub(crate) async fn wait_fired(
    fired: &mut mpsc::UnboundedReceiver<String>,
    limit: Duration,
) -> Result<String> {
    match tokio::time::timeout(limit + GRACE, fired.recv()).await {
        Ok(Some(key)) => Ok(key),
        Ok(None) => Err(anyhow!("handler dropped before firing")),
        Err(_) => Err(anyhow!("no expiry within {:?}", limit + GRACE)),
    }
}
