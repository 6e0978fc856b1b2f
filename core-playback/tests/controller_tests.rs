//! Integration tests for the player control path

mod common;

use common::*;
use core_async::sync::CancellationToken;
use core_playback::{PlaybackError, PlayerCommand, PlayerController};
use core_runtime::events::{EventBus, PlaybackEvent};
use std::io;
use std::time::Duration;
use tokio::sync::oneshot;

fn spawn_controller(
    engine: &RecordingEngine,
    bus: &EventBus,
    cancel: CancellationToken,
) -> (core_playback::ControlHandle, tokio::task::JoinHandle<()>) {
    let (controller, controls) =
        PlayerController::new(Box::new(engine.clone()), bus.clone(), cancel);
    (controls, tokio::spawn(controller.run()))
}

#[tokio::test]
async fn test_transport_commands_reach_engine_in_order() {
    let engine = RecordingEngine::with_remaining(1);
    let bus = EventBus::new(16);
    let (controls, task) = spawn_controller(&engine, &bus, CancellationToken::new());

    controls.prepare().await.unwrap();
    controls.play().await.unwrap();
    controls.skip_to_next().await.unwrap();

    assert_eq!(
        engine.calls(),
        vec!["prepare", "play", "advance", "prepare", "play"]
    );

    drop(controls);
    task.await.unwrap();
}

#[tokio::test]
async fn test_skip_unresolvable_reports_outcome() {
    let engine = RecordingEngine::with_remaining(1);
    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let (controls, task) = spawn_controller(&engine, &bus, CancellationToken::new());

    controls.skip_unresolvable(11).await.unwrap();
    assert_eq!(
        next_playback_event(&mut events).await,
        PlaybackEvent::TrackSkipped {
            track_id: Some(11),
            reason: "no playable url".to_string(),
        }
    );

    // Queue is now at its last entry.
    let err = controls.skip_unresolvable(12).await.unwrap_err();
    assert!(err.is_fatal());
    match err {
        PlaybackError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::NotFound),
        other => panic!("unexpected error: {:?}", other),
    }

    assert_eq!(engine.calls(), vec!["advance", "prepare", "play"]);

    drop(controls);
    task.await.unwrap();
}

#[tokio::test]
async fn test_engine_failure_stops_the_skip_sequence() {
    let engine = RecordingEngine::with_remaining(3).failing_prepare();
    let bus = EventBus::new(16);
    let (controls, task) = spawn_controller(&engine, &bus, CancellationToken::new());

    let err = controls.skip_unresolvable(1).await.unwrap_err();
    assert!(matches!(err, PlaybackError::Engine(_)));
    assert_eq!(engine.calls(), vec!["advance", "prepare"]);

    // The control task keeps serving commands after a failure.
    controls.play().await.unwrap();

    drop(controls);
    task.await.unwrap();
}

#[tokio::test]
async fn test_fire_and_forget_fallback() {
    let engine = RecordingEngine::with_remaining(1);
    let bus = EventBus::new(16);
    let mut events = bus.subscribe();
    let (controls, task) = spawn_controller(&engine, &bus, CancellationToken::new());

    controls.schedule_skip_unresolvable(5).unwrap();
    assert!(matches!(
        next_playback_event(&mut events).await,
        PlaybackEvent::TrackSkipped {
            track_id: Some(5),
            ..
        }
    ));

    drop(controls);
    task.await.unwrap();
}

#[tokio::test]
async fn test_no_command_runs_after_cancellation() {
    let engine = RecordingEngine::with_remaining(1);
    let bus = EventBus::new(16);
    let cancel = CancellationToken::new();

    let (controller, controls) =
        PlayerController::new(Box::new(engine.clone()), bus.clone(), cancel.clone());

    // Queued before the task starts, cancelled before it runs.
    let (reply, outcome) = oneshot::channel();
    controls
        .send(PlayerCommand::SkipUnresolvable {
            track_id: 3,
            reply: Some(reply),
        })
        .unwrap();
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), controller.run())
        .await
        .expect("controller ignored cancellation");

    assert!(outcome.await.is_err());
    assert!(engine.calls().is_empty());
    assert!(controls.is_closed());
    assert!(matches!(
        controls.play().await,
        Err(PlaybackError::ControlPathClosed)
    ));
}

#[tokio::test]
async fn test_controller_stops_when_handles_drop() {
    let engine = RecordingEngine::default();
    let bus = EventBus::new(16);
    let (controls, task) = spawn_controller(&engine, &bus, CancellationToken::new());

    let extra = controls.clone();
    drop(controls);
    assert!(!extra.is_closed());
    drop(extra);

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("controller kept running without handles")
        .unwrap();
}
