//! Integration tests for termination signal handling
//!
//! Signals go to the whole test process, so this lives in its own test
//! binary and runs serially.

use serial_test::serial;
use shutter::signals::SignalWatcher;
use std::process::Command;
use std::time::Duration;

fn send_to_self(signal: &str) {
    let status = Command::new("kill")
        .args(["-s", signal, &std::process::id().to_string()])
        .status()
        .expect("Failed to run kill");
    assert!(status.success());
}

async fn wait_for_signals(watcher: &SignalWatcher, count: usize) {
    for _ in 0..200 {
        if watcher.received() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
#[serial]
async fn test_sigterm_and_sigint_do_not_end_the_process() {
    let watcher = SignalWatcher::spawn().unwrap();

    send_to_self("TERM");
    wait_for_signals(&watcher, 1).await;
    assert_eq!(watcher.received(), 1);

    send_to_self("INT");
    wait_for_signals(&watcher, 2).await;

    // Still alive to assert, so neither signal terminated the process
    assert_eq!(watcher.received(), 2);
}
