// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Mutex;

#[test]
fn handler_receives_no_error_and_the_key() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    let handler = Handler::new(move |err, key| {
        seen_clone
            .lock()
            .unwrap()
            .push((err.is_none(), key.to_string()));
        Ok(())
    });

    invoke(&handler, 0, "job-1").unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![(true, "job-1".to_string())]);
}

#[test]
fn returned_error_becomes_failed() {
    let handler = Handler::new(|_, _| Err("db unavailable".into()));

    let err = invoke(&handler, 2, "job-1").unwrap_err();

    assert_eq!(
        err,
        HandlerError::Failed {
            key: "job-1".into(),
            index: 2,
            message: "db unavailable".into(),
        }
    );
}

#[test]
fn panic_becomes_panicked() {
    let handler = Handler::new(|_, key| panic!("boom on {}", key));

    let err = invoke(&handler, 0, "job-1").unwrap_err();

    assert!(matches!(
        &err,
        HandlerError::Panicked { message, .. } if message == "boom on job-1"
    ));
    assert_eq!(err.key(), "job-1");
}

#[test]
fn static_str_panic_message_is_kept() {
    let handler = Handler::new(|_, _| panic!("static boom"));

    let err = invoke(&handler, 0, "k").unwrap_err();
    assert!(err.to_string().contains("static boom"));
}

#[test]
fn clones_share_the_callback() {
    let handler = Handler::new(|_, _| Ok(()));
    let clone = handler.clone();
    let other = Handler::new(|_, _| Ok(()));

    assert!(handler.same_as(&clone));
    assert!(!handler.same_as(&other));
}
