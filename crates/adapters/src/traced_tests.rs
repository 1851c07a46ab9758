// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::memory::MemoryServer;
use crate::store::FakeStore;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

#[tokio::test]
async fn traced_store_passes_calls_through() {
    let fake = FakeStore::new();
    let traced = TracedStore::new(fake.clone());

    traced.set_with_ttl("job-1", 50).await.unwrap();
    assert!(traced.exists("job-1").await.unwrap());
    traced.delete("job-1").await.unwrap();

    assert_eq!(fake.calls().len(), 3);
    assert_eq!(fake.ttl_of("job-1"), None);
}

#[test]
fn traced_store_set_logs_span_and_fields() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedStore::new(FakeStore::new());
        traced.set_with_ttl("job-42", 1500).await
    });

    assert!(result.is_ok(), "set should succeed: {:?}", result);
    assert!(
        logs.contains("store.set_with_ttl"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(logs.contains("job-42"), "Should log key. Logs:\n{}", logs);
    assert!(logs.contains("1500"), "Should log ttl. Logs:\n{}", logs);
    assert!(logs.contains("key set"), "Should log completion. Logs:\n{}", logs);
}

#[test]
fn traced_store_logs_failures() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeStore::new();
        fake.set_failure(Some(StoreError::Connection("refused".into())));
        TracedStore::new(fake).delete("job-1").await
    });

    assert!(result.is_err());
    assert!(logs.contains("delete failed"), "Logs:\n{}", logs);
    assert!(logs.contains("refused"), "Logs:\n{}", logs);
}

#[test]
fn traced_store_notes_lapsed_ttl() {
    let (logs, _) = with_tracing(|| async {
        TracedStore::new(FakeStore::new())
            .set_with_ttl("late", -10)
            .await
    });

    assert!(logs.contains("ttl already lapsed"), "Logs:\n{}", logs);
}

#[test]
fn traced_channel_logs_subscription() {
    let (logs, result) = with_tracing(|| async {
        let server = MemoryServer::new();
        let traced = TracedChannel::new(server.channel());
        let rx = traced.subscribe("__keyevent@0__:expired").await;
        traced.unsubscribe("__keyevent@0__:expired").await.map(|_| rx.is_ok())
    });

    assert_eq!(result, Ok(true));
    assert!(logs.contains("channel.subscribe"), "Logs:\n{}", logs);
    assert!(logs.contains("__keyevent@0__:expired"), "Logs:\n{}", logs);
    assert!(logs.contains("unsubscribed"), "Logs:\n{}", logs);
}
