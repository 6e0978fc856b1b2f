//! # Track Address Resolver
//!
//! Installed into the engine's loading path as a [`FetchRequestResolver`].
//! For every fetch it either passes the request through, or replaces a track
//! reference with a concrete https URL obtained from the metadata source.
//!
//! ## Resolution flow
//!
//! 1. Classify the address. Anything that is not a `ting://music?id=N`
//!    reference is returned unchanged.
//! 2. Spawn the lookup on the runtime and block the loading thread on a
//!    oneshot until it reports back. Only the first candidate of each batch
//!    is considered; the lookup stops at the first batch where it has a URL.
//! 3. Found: upgrade to https and return the rewritten request.
//! 4. Not found (stream ended without a usable first candidate, or the wait
//!    timed out): send `SkipUnresolvable` to the control path and return the
//!    request unchanged so the engine's own fetch fails.
//!
//! The loading thread never touches the engine; the fallback is executed by
//! the control task.
//!
//! ## Blocking
//!
//! [`TrackAddressResolver::resolve_request`] blocks the calling thread. Call
//! it from the engine's loading thread or a `spawn_blocking` thread, never
//! from inside an async task.

use crate::config::ResolverConfig;
use crate::controller::ControlHandle;
use crate::error::{PlaybackError, Result};
use crate::track_ref::TrackReference;
use crate::url::{host_of, to_https};
use bridge_traits::error::BridgeError;
use bridge_traits::metadata::{MusicUrlStream, TrackMetadataSource};
use bridge_traits::playback::{FetchRequest, FetchRequestResolver};
use core_async::runtime::Handle;
use core_async::select;
use core_async::sync::{oneshot, CancellationToken};
use core_async::time::{timeout, Instant};
use core_runtime::events::{CoreEvent, EventBus, ResolutionEvent};
use core_runtime::logging::redact_url_query;
use futures::StreamExt;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, instrument, trace, warn};

#[derive(Debug, PartialEq, Eq)]
enum LookupOutcome {
    Found(String),
    Unresolvable,
    Cancelled,
}

pub struct TrackAddressResolver {
    metadata: Arc<dyn TrackMetadataSource>,
    controls: ControlHandle,
    runtime: Handle,
    cancel: CancellationToken,
    config: ResolverConfig,
    events: EventBus,
}

impl TrackAddressResolver {
    /// `runtime` runs the lookups; `cancel` is the session token shared with
    /// the control path.
    pub fn new(
        metadata: Arc<dyn TrackMetadataSource>,
        controls: ControlHandle,
        runtime: Handle,
        cancel: CancellationToken,
        config: ResolverConfig,
        events: EventBus,
    ) -> Self {
        Self {
            metadata,
            controls,
            runtime,
            cancel,
            config,
            events,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a fetch request. Blocks the calling thread during the lookup.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::InvalidTrackReference`] - the address is a track
    ///   reference without a numeric id
    /// - [`PlaybackError::InvalidUrl`] - the looked-up URL cannot be upgraded
    /// - [`PlaybackError::Cancelled`] - the session was torn down
    /// - [`PlaybackError::ControlPathClosed`] - the fallback could not be
    ///   scheduled
    #[instrument(skip(self, request), fields(uri = %redact_url_query(&request.uri)))]
    pub fn resolve_request(&self, request: FetchRequest) -> Result<FetchRequest> {
        let reference = match TrackReference::parse(&request.uri) {
            Ok(Some(reference)) => reference,
            Ok(None) => {
                trace!("Address is not a track reference");
                return Ok(request);
            }
            Err(err) => {
                error!(error = %err, "Malformed track reference");
                return Err(err);
            }
        };

        if self.cancel.is_cancelled() {
            return Err(PlaybackError::Cancelled);
        }

        let track_id = reference.id();
        let started = Instant::now();

        match self.await_lookup(track_id)? {
            LookupOutcome::Found(raw) => {
                let resolved = to_https(&raw)?;
                let elapsed_ms = started.elapsed().as_millis() as u64;

                debug!(
                    track_id,
                    elapsed_ms,
                    url = %redact_url_query(&resolved),
                    "Resolved track"
                );
                self.emit(ResolutionEvent::Resolved {
                    track_id,
                    host: host_of(&resolved).unwrap_or_default(),
                    elapsed_ms,
                });

                Ok(request.with_uri(resolved))
            }
            LookupOutcome::Unresolvable => {
                warn!(track_id, "No playable url, scheduling skip");
                self.emit(ResolutionEvent::Unresolvable { track_id });
                self.controls.schedule_skip_unresolvable(track_id)?;
                Ok(request)
            }
            LookupOutcome::Cancelled => {
                debug!(track_id, "Resolution cancelled");
                Err(PlaybackError::Cancelled)
            }
        }
    }

    fn await_lookup(&self, track_id: u64) -> Result<LookupOutcome> {
        let (done, outcome) = oneshot::channel();
        let stream = self.metadata.lookup(track_id);
        let cancel = self.cancel.clone();
        let events = self.events.clone();
        let limit = self.config.lookup_timeout;

        self.runtime.spawn(async move {
            let outcome = select! {
                biased;
                _ = cancel.cancelled() => LookupOutcome::Cancelled,
                found = timeout(limit, first_usable_url(stream, track_id, &events)) => match found {
                    Ok(Some(url)) => LookupOutcome::Found(url),
                    Ok(None) => LookupOutcome::Unresolvable,
                    Err(_) => {
                        warn!(track_id, timeout_ms = limit.as_millis() as u64, "Track lookup timed out");
                        LookupOutcome::Unresolvable
                    }
                },
            };
            // The loading thread may already be gone if the runtime is shutting down.
            done.send(outcome).ok();
        });

        // A dropped sender means the runtime dropped the task during shutdown.
        Ok(outcome
            .blocking_recv()
            .unwrap_or(LookupOutcome::Cancelled))
    }

    fn emit(&self, event: ResolutionEvent) {
        self.events.emit(CoreEvent::Resolution(event)).ok();
    }
}

/// Polls `stream` until a batch whose first candidate has a usable URL.
///
/// Empty batches, batches whose first candidate is blank, and error items
/// are skipped. Error items are also logged and reported.
async fn first_usable_url(
    mut stream: MusicUrlStream,
    track_id: u64,
    events: &EventBus,
) -> Option<String> {
    while let Some(item) = stream.next().await {
        match item {
            Ok(batch) => match batch.first_url() {
                Some(url) => return Some(url.to_owned()),
                None => trace!(
                    track_id,
                    candidates = batch.data.len(),
                    "Lookup batch has no usable first candidate"
                ),
            },
            Err(err) => {
                warn!(track_id, error = %err, "Track lookup item failed");
                events
                    .emit(CoreEvent::Resolution(ResolutionEvent::LookupFailed {
                        track_id,
                        message: err.to_string(),
                    }))
                    .ok();
            }
        }
    }
    None
}

impl FetchRequestResolver for TrackAddressResolver {
    fn resolve(&self, request: FetchRequest) -> bridge_traits::error::Result<FetchRequest> {
        self.resolve_request(request).map_err(BridgeError::from)
    }
}

impl fmt::Debug for TrackAddressResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackAddressResolver")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
