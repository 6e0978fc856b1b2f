//! # Playback Session
//!
//! Wires one engine, one metadata source and one cancellation token into a
//! running control task plus a resolver for the engine's loading path.

use crate::config::ResolverConfig;
use crate::controller::{ControlHandle, PlayerController};
use crate::resolver::TrackAddressResolver;
use bridge_traits::metadata::TrackMetadataSource;
use bridge_traits::playback::PlaybackEngine;
use core_async::runtime::Handle;
use core_async::sync::CancellationToken;
use core_async::task::JoinHandle;
use core_runtime::events::EventBus;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct PlaybackSession {
    id: Uuid,
    resolver: Arc<TrackAddressResolver>,
    controls: ControlHandle,
    events: EventBus,
    cancel: CancellationToken,
    controller: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackSession {
    /// Spawn the control task on `runtime` and build the resolver.
    ///
    /// Both share a single cancellation token; [`shutdown`](Self::shutdown)
    /// (or dropping the session) cancels pending lookups and stops the
    /// control task.
    pub fn start(
        engine: Box<dyn PlaybackEngine>,
        metadata: Arc<dyn TrackMetadataSource>,
        config: ResolverConfig,
        events: EventBus,
        runtime: Handle,
    ) -> Self {
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();

        let (controller, controls) =
            PlayerController::new(engine, events.clone(), cancel.clone());
        let task = runtime.spawn(controller.run());

        let resolver = Arc::new(TrackAddressResolver::new(
            metadata,
            controls.clone(),
            runtime,
            cancel.clone(),
            config,
            events.clone(),
        ));

        info!(
            session_id = %id,
            lookup_timeout_ms = config.lookup_timeout.as_millis() as u64,
            "Playback session started"
        );

        Self {
            id,
            resolver,
            controls,
            events,
            cancel,
            controller: Mutex::new(Some(task)),
        }
    }

    /// Identifier carried in this session's log lines.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Resolver to install into the engine's loading path.
    pub fn resolver(&self) -> Arc<TrackAddressResolver> {
        Arc::clone(&self.resolver)
    }

    pub fn controls(&self) -> ControlHandle {
        self.controls.clone()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel all pending work and wait for the control task to finish.
    ///
    /// Safe to call more than once.
    pub async fn shutdown(&self) {
        self.cancel.cancel();

        let task = self.controller.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(error = %err, "Player controller task failed");
            }
            info!(session_id = %self.id, "Playback session shut down");
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("id", &self.id)
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}
