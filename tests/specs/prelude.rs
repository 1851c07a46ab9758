//! Shared helpers for behavioral specs

#![allow(dead_code)]

pub use lapse_adapters::{MemoryChannel, MemoryServer, MemoryStore};
pub use lapse_engine::{
    CancelOptions, Handler, HandlerOptions, RescheduleOptions, ScheduleOptions, Scheduler,
    SchedulerConfig, SchedulerError, SystemClock, Ttl, ValidationError,
};
use std::sync::{Arc, Mutex};
pub use std::time::{Duration, Instant};

pub type Engine = Scheduler<MemoryStore, MemoryChannel, SystemClock>;

/// One handler invocation: label, whether an error was passed, key, and when
#[derive(Debug, Clone)]
pub struct Fired {
    pub label: &'static str,
    pub had_error: bool,
    pub key: String,
    pub at: Instant,
}

#[derive(Clone, Default)]
pub struct Recorder {
    fired: Arc<Mutex<Vec<Fired>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self, label: &'static str) -> Handler {
        let fired = Arc::clone(&self.fired);
        Handler::new(move |err, key| {
            fired.lock().unwrap().push(Fired {
                label,
                had_error: err.is_some(),
                key: key.to_string(),
                at: Instant::now(),
            });
            Ok(())
        })
    }

    pub fn fired(&self) -> Vec<Fired> {
        self.fired.lock().unwrap().clone()
    }

    /// `label:key` for every invocation, in order
    pub fn labels(&self) -> Vec<String> {
        self.fired()
            .iter()
            .map(|f| format!("{}:{}", f.label, f.key))
            .collect()
    }
}

pub async fn engine() -> (Engine, MemoryServer) {
    let server = MemoryServer::new();
    let scheduler = Scheduler::start(
        server.store(),
        server.channel(),
        SystemClock,
        &SchedulerConfig::default(),
    )
    .await
    .unwrap();
    (scheduler, server)
}

pub async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
