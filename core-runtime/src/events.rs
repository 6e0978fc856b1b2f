//! # Event Bus System
//!
//! Broadcast channel through which the playback core reports what happened on
//! its loading and control paths, so the host UI can react (toasts, queue
//! highlighting) without being coupled to the resolver.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐  Resolution   ┌───────────┐
//! │   Resolver    ├──────────────>│           │     subscribe    ┌────────────┐
//! │ (loading path)│               │ EventBus  ├─────────────────>│  Host UI   │
//! └───────────────┘               │ (broadcast│                  └────────────┘
//! ┌───────────────┐  Playback     │  channel) │     subscribe    ┌────────────┐
//! │  Controller   ├──────────────>│           ├─────────────────>│  Logger    │
//! │ (control path)│               └───────────┘                  └────────────┘
//! └───────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let bus = EventBus::new(16);
//! let mut subscriber = bus.subscribe();
//!
//! bus.emit(CoreEvent::Playback(PlaybackEvent::TrackSkipped {
//!     track_id: Some(42),
//!     reason: "no playable url".to_string(),
//! }))
//! .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert!(matches!(event, CoreEvent::Playback(PlaybackEvent::TrackSkipped { .. })));
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - `RecvError::Lagged(n)`: the subscriber missed `n` events; keep receiving.
//! - `RecvError::Closed`: every sender is gone; the session has shut down.
//!
//! Emitting with no subscribers returns an error. Core components ignore it:
//! events are informational and nobody is obliged to listen.

use core_async::sync::broadcast;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use core_async::sync::broadcast::error::{RecvError, SendError};
pub use core_async::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 64;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event published on the bus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Control-path events (queue movement, fatal playback errors)
    Playback(PlaybackEvent),
    /// Loading-path events (track address resolution)
    Resolution(ResolutionEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Resolution(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Playback(PlaybackEvent::Error { recoverable: false, .. })
            | CoreEvent::Playback(PlaybackEvent::QueueExhausted { .. }) => EventSeverity::Error,
            CoreEvent::Playback(PlaybackEvent::Error { .. })
            | CoreEvent::Resolution(ResolutionEvent::Unresolvable { .. })
            | CoreEvent::Resolution(ResolutionEvent::LookupFailed { .. }) => {
                EventSeverity::Warning
            }
            CoreEvent::Playback(PlaybackEvent::TrackSkipped { .. }) => EventSeverity::Info,
            CoreEvent::Resolution(ResolutionEvent::Resolved { .. }) => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Playback Events
// ============================================================================

/// Events emitted from the control path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// The queue moved past an entry, either by user request or because the
    /// entry could not be resolved.
    TrackSkipped {
        /// Track id of the skipped entry, when it was a track reference.
        track_id: Option<u64>,
        /// Why the entry was skipped.
        reason: String,
    },
    /// An unresolvable entry was the last one in the queue.
    QueueExhausted {
        /// Track id of the entry that could not be resolved.
        track_id: u64,
    },
    /// An engine command or fallback failed.
    Error {
        /// The track id if available.
        track_id: Option<u64>,
        /// Human-readable error message.
        message: String,
        /// Whether playback can continue.
        recoverable: bool,
    },
}

impl PlaybackEvent {
    fn description(&self) -> &str {
        match self {
            PlaybackEvent::TrackSkipped { .. } => "Track skipped",
            PlaybackEvent::QueueExhausted { .. } => "Queue exhausted",
            PlaybackEvent::Error { .. } => "Playback error",
        }
    }
}

// ============================================================================
// Resolution Events
// ============================================================================

/// Events emitted from the engine's loading path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum ResolutionEvent {
    /// A track reference was turned into a concrete URL.
    Resolved {
        track_id: u64,
        /// Host of the resolved URL (never the full signed URL).
        host: String,
        /// Time spent waiting on the lookup.
        elapsed_ms: u64,
    },
    /// The lookup finished without a usable URL; fallback was scheduled.
    Unresolvable { track_id: u64 },
    /// One item of the lookup stream failed; the lookup kept going.
    LookupFailed { track_id: u64, message: String },
}

impl ResolutionEvent {
    fn description(&self) -> &str {
        match self {
            ResolutionEvent::Resolved { .. } => "Track resolved",
            ResolutionEvent::Unresolvable { .. } => "Track unresolvable",
            ResolutionEvent::LookupFailed { .. } => "Track lookup failed",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Cloning the bus clones the sender; every `subscribe()` creates an
/// independent receiver that sees events emitted after it was created.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// A subscriber that falls more than `capacity` events behind receives
    /// `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error when nobody is subscribed.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A `broadcast::Receiver` with an optional filter.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus, EventStream};
///
/// let bus = EventBus::default();
/// let playback_only = EventStream::new(bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Playback(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` are returned from `recv`/`try_recv`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching event is currently buffered.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
