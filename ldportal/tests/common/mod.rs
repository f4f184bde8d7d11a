// Shared helpers for the integration test crates.
#![allow(dead_code)]


use std::sync::mpsc::Receiver;
use std::time::Duration;

use ldportal::TagEvent;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Next event within `timeout`, or panic with `what`.
pub fn next_event(rx: &Receiver<TagEvent>, what: &str) -> TagEvent {
    rx.recv_timeout(Duration::from_secs(2))
        .unwrap_or_else(|_| panic!("no event: {}", what))
}

/// Assert nothing else arrives for a short while.
pub fn assert_quiet(rx: &Receiver<TagEvent>) {
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}
