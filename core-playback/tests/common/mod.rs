//! Shared fixtures for playback integration tests.

#![allow(dead_code)]

use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::metadata::{MusicUrl, MusicUrlBatch, MusicUrlStream, TrackMetadataSource};
use bridge_traits::playback::PlaybackEngine;
use core_runtime::events::{CoreEvent, PlaybackEvent, Receiver, ResolutionEvent};
use futures::stream::{self, StreamExt};
use mockall::mock;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

mock! {
    pub Metadata {}

    impl TrackMetadataSource for Metadata {
        fn lookup(&self, track_id: u64) -> MusicUrlStream;
    }
}

/// Engine fake that records every command and the thread it ran on.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    state: Arc<Mutex<EngineState>>,
}

#[derive(Default)]
struct EngineState {
    remaining: usize,
    calls: Vec<&'static str>,
    threads: Vec<ThreadId>,
    fail_prepare: bool,
}

impl RecordingEngine {
    /// An engine positioned so that `remaining` entries follow the current one.
    pub fn with_remaining(remaining: usize) -> Self {
        let engine = Self::default();
        engine.state.lock().unwrap().remaining = remaining;
        engine
    }

    pub fn failing_prepare(self) -> Self {
        self.state.lock().unwrap().fail_prepare = true;
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn threads(&self) -> Vec<ThreadId> {
        self.state.lock().unwrap().threads.clone()
    }

    fn record(&self, call: &'static str) -> std::sync::MutexGuard<'_, EngineState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.threads.push(thread::current().id());
        state
    }
}

impl PlaybackEngine for RecordingEngine {
    fn has_next_entry(&self) -> bool {
        self.state.lock().unwrap().remaining > 0
    }

    fn advance_to_next(&mut self) -> BridgeResult<()> {
        let mut state = self.record("advance");
        state.remaining = state.remaining.saturating_sub(1);
        Ok(())
    }

    fn prepare(&mut self) -> BridgeResult<()> {
        let state = self.record("prepare");
        if state.fail_prepare {
            return Err(BridgeError::OperationFailed("decoder unavailable".to_string()));
        }
        Ok(())
    }

    fn play(&mut self) -> BridgeResult<()> {
        self.record("play");
        Ok(())
    }
}

pub fn batch(url: &str) -> MusicUrlBatch {
    MusicUrlBatch::new(vec![MusicUrl::new(42, url)])
}

pub fn batches(items: Vec<BridgeResult<MusicUrlBatch>>) -> MusicUrlStream {
    stream::iter(items).boxed()
}

/// Batches followed by a stream that never ends.
pub fn batches_then_pending(items: Vec<BridgeResult<MusicUrlBatch>>) -> MusicUrlStream {
    stream::iter(items).chain(stream::pending()).boxed()
}

pub async fn next_playback_event(events: &mut Receiver<CoreEvent>) -> PlaybackEvent {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for playback event")
            .expect("event bus closed");
        if let CoreEvent::Playback(event) = event {
            return event;
        }
    }
}

pub async fn next_resolution_event(events: &mut Receiver<CoreEvent>) -> ResolutionEvent {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .expect("timed out waiting for resolution event")
            .expect("event bus closed");
        if let CoreEvent::Resolution(event) = event {
            return event;
        }
    }
}
