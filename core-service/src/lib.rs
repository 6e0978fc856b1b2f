//! Core service façade.
//!
//! Wires a validated [`CoreConfig`] and the host's playback engine into a
//! running [`MusicService`]:
//!
//! - the music API client, wrapped in the URL cache
//! - the event bus
//! - a [`PlaybackSession`] (control task and loading-path resolver)
//!
//! Desktop builds enable the `desktop-shims` feature so the config builder
//! can fall back to the reqwest HTTP client. Android hosts inject their own.
//!
//! ```ignore
//! use core_service::{CoreConfig, MusicService};
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://music.example.com/api")
//!     .build()?;
//! let service = MusicService::start(config, Box::new(engine))?;
//!
//! player.set_resolver(service.resolver());
//! // ...
//! service.shutdown().await;
//! ```

pub mod error;

pub use error::{CoreError, Result};

pub use core_playback::{ControlHandle, TrackAddressResolver, TrackReference};
pub use core_runtime::config::CoreConfig;
pub use core_runtime::events::{CoreEvent, EventStream};

use bridge_traits::playback::PlaybackEngine;
use core_async::runtime::{self, Handle};
use core_metadata::{CachedMusicUrlSource, MusicUrlApi};
use core_playback::{PlaybackSession, ResolverConfig};
use core_runtime::events::{EventBus, Receiver};
use std::sync::Arc;
use tracing::info;

/// Primary façade exposed to host applications.
pub struct MusicService {
    config: CoreConfig,
    events: EventBus,
    urls: Arc<CachedMusicUrlSource<MusicUrlApi>>,
    session: PlaybackSession,
}

impl MusicService {
    /// Start the service on the current tokio runtime.
    ///
    /// Fails with [`CoreError::InitializationFailed`] when called outside a
    /// runtime.
    pub fn start(config: CoreConfig, engine: Box<dyn PlaybackEngine>) -> Result<Self> {
        let handle = runtime::current_handle().map_err(|e| {
            CoreError::InitializationFailed(format!(
                "MusicService::start must run inside a tokio runtime: {}",
                e
            ))
        })?;
        Self::start_with_handle(config, engine, handle)
    }

    /// Start the service on an explicit runtime.
    ///
    /// Useful when the host owns a dedicated runtime and starts the service
    /// from one of its own threads.
    pub fn start_with_handle(
        config: CoreConfig,
        engine: Box<dyn PlaybackEngine>,
        handle: Handle,
    ) -> Result<Self> {
        config.validate()?;

        let resolver_config = ResolverConfig::from(&config.resolver);
        resolver_config
            .validate()
            .map_err(CoreError::Config)?;

        let events = EventBus::new(config.event_buffer_size);
        let urls = Arc::new(CachedMusicUrlSource::with_settings(
            MusicUrlApi::from_config(&config),
            Arc::clone(&config.clock),
            &config.cache,
        ));

        let session = PlaybackSession::start(
            engine,
            urls.clone(),
            resolver_config,
            events.clone(),
            handle,
        );

        info!(api = %config.api_base(), "Music service started");

        Ok(Self {
            config,
            events,
            urls,
            session,
        })
    }

    /// Resolver to install into the engine's loading path.
    pub fn resolver(&self) -> Arc<TrackAddressResolver> {
        self.session.resolver()
    }

    pub fn controls(&self) -> ControlHandle {
        self.session.controls()
    }

    pub fn subscribe_events(&self) -> Receiver<CoreEvent> {
        self.events.subscribe()
    }

    pub fn event_stream(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    /// Drop the cached URL of a track, e.g. after the engine reports that a
    /// resolved URL stopped working.
    pub fn invalidate_track(&self, track_id: u64) {
        self.urls.invalidate(track_id);
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn is_shut_down(&self) -> bool {
        self.session.is_shut_down()
    }

    /// Cancel pending lookups and stop the control task.
    pub async fn shutdown(&self) {
        self.session.shutdown().await;
        self.urls.clear();
    }
}

impl std::fmt::Debug for MusicService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicService")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish()
    }
}
