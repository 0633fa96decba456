#![cfg(unix)]

mod common;
use crate::common::{init_tracing, sh_runner, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use tagrun::errors::TagrunError;

#[tokio::test]
async fn second_run_while_busy_is_rejected() {
    init_tracing();
    let (runner, sink) = sh_runner();
    let runner = Arc::new(runner);

    let first = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { runner.run("sleep", "1", "A").await })
    };

    let running = with_timeout(async {
        loop {
            if let Some(p) = runner.running() {
                return p;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert_eq!(running.tag, "A");
    assert!(running.pid > 0);

    // Busy wins over lookup failures.
    match runner.run("nonexistent-binary-xyz", "", "C").await {
        Err(TagrunError::AlreadyRunning { tag, .. }) => assert_eq!(tag, "A"),
        other => panic!("expected AlreadyRunning, got {other:?}"),
    }

    match runner.run("echo", "nope", "B").await {
        Err(TagrunError::AlreadyRunning { pid, tag }) => {
            assert_eq!(pid, running.pid);
            assert_eq!(tag, "A");
        }
        other => panic!("expected AlreadyRunning, got {other:?}"),
    }

    assert!(with_timeout(first).await.unwrap().unwrap());
    assert!(runner.running().is_none());
    assert!(sink.stream("B>").is_empty());
}

#[tokio::test]
async fn handle_is_released_after_each_run() {
    init_tracing();
    let (runner, sink) = sh_runner();

    assert!(!with_timeout(runner.run("exit", "1", "one")).await.unwrap());
    assert!(runner.running().is_none());

    assert!(with_timeout(runner.run("echo", "two", "two")).await.unwrap());
    assert!(runner.running().is_none());

    assert_eq!(sink.lines(), vec!["two>two".to_string()]);
}

#[tokio::test]
async fn dropping_a_run_releases_the_handle() {
    init_tracing();
    let (runner, _sink) = sh_runner();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(200), runner.run("sleep", "5", "slow")).await;
    assert!(timed_out.is_err());
    assert!(runner.running().is_none());

    assert!(with_timeout(runner.run("true", "", "next")).await.unwrap());
}
