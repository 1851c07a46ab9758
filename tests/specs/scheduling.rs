//! Scheduling, rescheduling and cancellation timing

use crate::prelude::*;

#[tokio::test]
async fn scheduled_key_fires_once_within_window() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();
    let started = Instant::now();

    scheduler
        .schedule(
            ScheduleOptions::new("job-1")
                .ttl(Ttl::millis(50))
                .handler(recorder.handler("h1")),
        )
        .await
        .unwrap();

    sleep_ms(300).await;

    let fired = recorder.fired();
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].key, "job-1");
    assert!(!fired[0].had_error);
    let elapsed = fired[0].at - started;
    assert!(elapsed >= Duration::from_millis(50), "fired after {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(200), "fired after {:?}", elapsed);

    scheduler.end().await.unwrap();
}

#[tokio::test]
async fn reschedule_fires_at_new_time() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();
    let started = Instant::now();

    scheduler
        .schedule(
            ScheduleOptions::new("job-2")
                .ttl(Ttl::millis(1000))
                .handler(recorder.handler("h1")),
        )
        .await
        .unwrap();
    scheduler
        .reschedule(RescheduleOptions::new("job-2", Ttl::millis(50)))
        .await
        .unwrap();

    sleep_ms(200).await;
    let fired = recorder.fired();
    assert_eq!(fired.len(), 1);
    assert!(fired[0].at - started < Duration::from_millis(200));

    // The original deadline passes without a second firing
    sleep_ms(1000).await;
    assert_eq!(recorder.fired().len(), 1);

    scheduler.end().await.unwrap();
}

#[tokio::test]
async fn absolute_deadline_is_honored() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();
    let deadline = chrono::Utc::now() + chrono::Duration::milliseconds(60);

    scheduler
        .schedule(
            ScheduleOptions::new("at-deadline")
                .ttl(deadline)
                .handler(recorder.handler("h1")),
        )
        .await
        .unwrap();

    sleep_ms(250).await;
    assert_eq!(recorder.labels(), vec!["h1:at-deadline"]);
}

#[tokio::test]
async fn past_deadline_fires_immediately_on_memory_backend() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();
    let deadline = chrono::Utc::now() - chrono::Duration::seconds(5);

    scheduler
        .schedule(
            ScheduleOptions::new("overdue")
                .ttl(deadline)
                .handler(recorder.handler("h1")),
        )
        .await
        .unwrap();

    sleep_ms(100).await;
    assert_eq!(recorder.labels(), vec!["h1:overdue"]);
}

#[tokio::test]
async fn cancelled_key_stays_silent() {
    let (scheduler, server) = engine().await;
    let recorder = Recorder::new();

    scheduler
        .schedule(
            ScheduleOptions::new("job-3")
                .ttl(Ttl::millis(50))
                .handler(recorder.handler("h1")),
        )
        .await
        .unwrap();
    scheduler.cancel(CancelOptions::new("job-3")).await.unwrap();

    sleep_ms(200).await;
    assert!(recorder.fired().is_empty());
    assert!(!server.contains("job-3"));
}

#[tokio::test]
async fn cancel_of_unknown_key_succeeds() {
    let (scheduler, _server) = engine().await;
    scheduler
        .cancel(CancelOptions::new("never-scheduled"))
        .await
        .unwrap();
}

#[tokio::test]
async fn operations_after_end_are_rejected() {
    let (scheduler, _server) = engine().await;
    scheduler.end().await.unwrap();

    let result = scheduler
        .schedule(ScheduleOptions::new("job-4").ttl(Ttl::millis(10)))
        .await;
    assert_eq!(result, Err(SchedulerError::Ended));
}
