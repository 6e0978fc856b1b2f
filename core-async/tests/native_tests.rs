//! Integration tests for the primitives the playback core relies on.
//!
//! The resolver blocks a host thread on a oneshot signal that is completed by
//! a task on the runtime, so most cases here exercise that hand-off.

use core_async::{runtime, sync, task, time};
use std::sync::Arc;

#[tokio::test]
async fn test_task_spawn() {
    let handle = task::spawn(async { 42 });
    let result = handle.await.unwrap();
    assert_eq!(result, 42);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_thread_waits_on_oneshot_completed_by_runtime() {
    let handle = runtime::current_handle().unwrap();

    let value = task::spawn_blocking(move || {
        let (tx, rx) = sync::oneshot::channel();
        handle.spawn(async move {
            time::sleep(time::Duration::from_millis(10)).await;
            let _ = tx.send(7u64);
        });
        rx.blocking_recv()
    })
    .await
    .unwrap();

    assert_eq!(value, Ok(7));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_oneshot_reports_dropped_sender() {
    let handle = runtime::current_handle().unwrap();

    let result = task::spawn_blocking(move || {
        let (tx, rx) = sync::oneshot::channel::<u64>();
        handle.spawn(async move {
            drop(tx);
        });
        rx.blocking_recv()
    })
    .await
    .unwrap();

    assert!(result.is_err());
}

#[tokio::test]
async fn test_timeout_success() {
    let result = time::timeout(time::Duration::from_millis(100), async {
        time::sleep(time::Duration::from_millis(10)).await;
        42
    })
    .await;

    assert_eq!(result.unwrap(), 42);
}

#[tokio::test]
async fn test_timeout_failure() {
    let result = time::timeout(time::Duration::from_millis(10), async {
        time::sleep(time::Duration::from_millis(200)).await;
        42
    })
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_cancellation_token_wakes_waiters() {
    let token = sync::CancellationToken::new();
    let child = token.child_token();

    let waiter = task::spawn(async move {
        child.cancelled().await;
        "cancelled"
    });

    token.cancel();
    assert_eq!(waiter.await.unwrap(), "cancelled");
}

#[tokio::test]
async fn test_unbounded_mpsc_preserves_order() {
    let (tx, mut rx) = sync::mpsc::unbounded_channel();
    for i in 0..5u32 {
        tx.send(i).unwrap();
    }
    drop(tx);

    let mut received = Vec::new();
    while let Some(value) = rx.recv().await {
        received.push(value);
    }
    assert_eq!(received, vec![0, 1, 2, 3, 4]);
}

#[tokio::test]
async fn test_broadcast_fan_out() {
    let (tx, mut rx1) = sync::broadcast::channel(4);
    let mut rx2 = tx.subscribe();

    tx.send("skip").unwrap();

    assert_eq!(rx1.recv().await.unwrap(), "skip");
    assert_eq!(rx2.recv().await.unwrap(), "skip");
}

#[tokio::test]
async fn test_mutex_shared_between_tasks() {
    let mutex = Arc::new(sync::Mutex::new(0));
    let mutex_clone = mutex.clone();

    task::spawn(async move {
        let mut guard = mutex_clone.lock().await;
        *guard += 1;
    })
    .await
    .unwrap();

    assert_eq!(*mutex.lock().await, 1);
}

#[test]
fn test_build_multi_thread_runtime() {
    let rt = runtime::build_multi_thread(0).unwrap();
    let value = rt.block_on(async { task::spawn(async { 3 }).await.unwrap() });
    assert_eq!(value, 3);
}

#[tokio::test]
async fn test_select_prefers_cancellation() {
    let cancel = sync::CancellationToken::new();
    cancel.cancel();

    let outcome = core_async::select! {
        biased;
        _ = cancel.cancelled() => None,
        value = async { 7 } => Some(value),
    };
    assert_eq!(outcome, None);
}
