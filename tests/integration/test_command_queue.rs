//! Integration Tests for the command queue
//!
//! Commands must start one at a time in submission order, and their
//! callbacks must fire in that same order whatever each process's duration.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

use gitview::process::{CommandQueue, CommandRequest, ProcessOutcome};
use test_utils::{Fixture, ScriptedRunner};

fn request(name: &str) -> CommandRequest {
    CommandRequest::new("/tmp", [name])
}

#[tokio::test]
async fn test_callbacks_follow_submission_order() {
    let runner = ScriptedRunner::new();
    // The first command is the slowest; the last is instant
    runner.script("a", Fixture::ok("a").after(Duration::from_millis(40)));
    runner.script("b", Fixture::ok("b").after(Duration::from_millis(10)));
    runner.script("c", Fixture::ok("c"));

    let queue = CommandQueue::new(runner.clone());
    let order = Arc::new(Mutex::new(Vec::new()));
    let (done_tx, done_rx) = oneshot::channel();
    let mut done_tx = Some(done_tx);

    for name in ["a", "b", "c"] {
        let order = Arc::clone(&order);
        let done = if name == "c" { done_tx.take() } else { None };
        queue.enqueue(request(name), move |outcome| {
            if let ProcessOutcome::Exited(output) = outcome {
                order.lock().unwrap().push(output.stdout_text());
            }
            if let Some(done) = done {
                let _ = done.send(());
            }
        });
    }

    tokio::time::timeout(Duration::from_secs(5), done_rx)
        .await
        .expect("queue never drained")
        .unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c"]);
    assert_eq!(runner.calls(), vec!["a", "b", "c"]);
    assert_eq!(runner.max_concurrency(), 1);
}

#[tokio::test]
async fn test_only_one_process_at_a_time() {
    let runner = ScriptedRunner::new();
    for name in ["1", "2", "3", "4", "5"] {
        runner.script(name, Fixture::ok(name).after(Duration::from_millis(5)));
    }
    let queue = CommandQueue::new(runner.clone());

    let runs: Vec<_> = ["1", "2", "3", "4", "5"]
        .into_iter()
        .map(|name| {
            let queue = queue.clone();
            tokio::spawn(async move { queue.run(request(name)).await })
        })
        .collect();
    for run in runs {
        assert!(matches!(run.await.unwrap(), ProcessOutcome::Exited(_)));
    }

    assert_eq!(runner.calls().len(), 5);
    assert_eq!(runner.max_concurrency(), 1);
    assert!(queue.is_idle());
    assert!(queue.is_empty());
}

#[tokio::test]
async fn test_failures_do_not_stall_the_queue() {
    let runner = ScriptedRunner::new();
    runner.script("broken", Fixture::not_started());
    runner.script("fine", Fixture::ok("ok"));
    let queue = CommandQueue::new(runner);

    let first = queue.run(request("broken"));
    let second = queue.run(request("fine"));
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(first, ProcessOutcome::FailedToStart { .. }));
    match second {
        ProcessOutcome::Exited(output) => assert_eq!(output.stdout_text(), "ok"),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_len_counts_waiting_commands() {
    let runner = ScriptedRunner::new();
    runner.script("slow", Fixture::ok("").after(Duration::from_millis(50)));
    runner.script("fast", Fixture::ok(""));
    let queue = CommandQueue::new(runner);

    assert!(queue.is_idle());
    queue.enqueue(request("slow"), |_| {});
    queue.enqueue(request("fast"), |_| {});
    assert_eq!(queue.len(), 2);
    assert!(!queue.is_idle());

    queue.run(request("fast")).await;
    assert!(queue.is_empty());
}
