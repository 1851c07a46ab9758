//! Missing required arguments

use crate::prelude::*;

#[tokio::test]
async fn schedule_without_key_fails() {
    let (scheduler, server) = engine().await;

    let result = scheduler.schedule(ScheduleOptions::default()).await;

    assert!(matches!(
        result,
        Err(SchedulerError::Validation(ValidationError::MissingKey { .. }))
    ));
    assert!(server.is_empty());
}

#[tokio::test]
async fn reschedule_without_fields_fails() {
    let (scheduler, _server) = engine().await;

    let result = scheduler.reschedule(RescheduleOptions::default()).await;

    assert!(matches!(result, Err(SchedulerError::Validation(_))));
}

#[tokio::test]
async fn add_handler_without_fields_fails_synchronously() {
    let (scheduler, _server) = engine().await;

    let result = scheduler.add_handler(HandlerOptions::default());

    assert!(matches!(
        result,
        Err(SchedulerError::Validation(ValidationError::MissingKey { .. }))
    ));
}

#[tokio::test]
async fn cancel_without_key_fails() {
    let (scheduler, _server) = engine().await;

    let result = scheduler.cancel(CancelOptions::default()).await;

    assert!(matches!(result, Err(SchedulerError::Validation(_))));
}
