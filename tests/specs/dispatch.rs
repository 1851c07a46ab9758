//! Which handlers run for an expiry, and in what order

use crate::prelude::*;

#[tokio::test]
async fn handlers_on_one_key_fire_in_registration_order() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();

    scheduler
        .schedule(
            ScheduleOptions::new("job-1")
                .ttl(Ttl::millis(50))
                .handler(recorder.handler("first")),
        )
        .await
        .unwrap();
    scheduler
        .add_handler(HandlerOptions::new("job-1", recorder.handler("second")))
        .unwrap();

    sleep_ms(200).await;
    assert_eq!(recorder.labels(), vec!["first:job-1", "second:job-1"]);
}

#[tokio::test]
async fn pattern_fires_only_for_matching_keys() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();

    scheduler
        .add_handler(HandlerOptions::new("test-*", recorder.handler("pattern")).pattern(true))
        .unwrap();
    scheduler
        .schedule(ScheduleOptions::new("test-1").ttl(Ttl::millis(30)))
        .await
        .unwrap();
    scheduler
        .schedule(ScheduleOptions::new("foo-1").ttl(Ttl::millis(30)))
        .await
        .unwrap();

    sleep_ms(200).await;
    assert_eq!(recorder.labels(), vec!["pattern:test-1"]);
}

#[tokio::test]
async fn key_matching_two_patterns_fires_each_once() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();

    scheduler
        .add_handler(HandlerOptions::new("^report", recorder.handler("prefix")).pattern(true))
        .unwrap();
    scheduler
        .add_handler(HandlerOptions::new("daily$", recorder.handler("suffix")).pattern(true))
        .unwrap();
    scheduler
        .schedule(ScheduleOptions::new("report-daily").ttl(Ttl::millis(30)))
        .await
        .unwrap();

    sleep_ms(200).await;
    assert_eq!(
        recorder.labels(),
        vec!["prefix:report-daily", "suffix:report-daily"]
    );
}

#[tokio::test]
async fn exact_and_pattern_registrations_both_fire() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();
    let shared = recorder.handler("shared");

    scheduler
        .add_handler(HandlerOptions::new("test-*", shared.clone()).pattern(true))
        .unwrap();
    scheduler
        .schedule(
            ScheduleOptions::new("test-1")
                .ttl(Ttl::millis(30))
                .handler(shared),
        )
        .await
        .unwrap();

    sleep_ms(200).await;
    assert_eq!(recorder.labels(), vec!["shared:test-1", "shared:test-1"]);
}

#[tokio::test]
async fn handler_added_after_scheduling_still_fires() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();

    scheduler
        .schedule(ScheduleOptions::new("job-late").ttl(Ttl::millis(100)))
        .await
        .unwrap();
    sleep_ms(30).await;
    scheduler
        .add_handler(HandlerOptions::new("job-late", recorder.handler("late")))
        .unwrap();

    sleep_ms(250).await;
    assert_eq!(recorder.labels(), vec!["late:job-late"]);
}

#[tokio::test]
async fn failing_handler_does_not_block_siblings() {
    let (scheduler, _server) = engine().await;
    let recorder = Recorder::new();

    scheduler
        .add_handler(HandlerOptions::new(
            "job-err",
            Handler::new(|_, _| Err("handler failure".into())),
        ))
        .unwrap();
    scheduler
        .schedule(
            ScheduleOptions::new("job-err")
                .ttl(Ttl::millis(30))
                .handler(recorder.handler("after")),
        )
        .await
        .unwrap();

    sleep_ms(200).await;
    assert_eq!(recorder.labels(), vec!["after:job-err"]);
}
