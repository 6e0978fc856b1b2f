//! Playback engine contracts.
//!
//! The host owns the actual player (queue, decoder, output). The core only
//! needs a small command set to drive it and a hook into its loading path:
//!
//! - [`PlaybackEngine`] is consumed by the core. It is driven exclusively from
//!   the core's control-path task, never from the loading path.
//! - [`FetchRequestResolver`] is implemented by the core and installed by the
//!   host into the engine's loading path. The engine calls it synchronously
//!   right before it fetches bytes for a queue entry.

use crate::error::Result;
use std::collections::HashMap;

/// Descriptor of the bytes the engine is about to load.
///
/// Mirrors what a data source receives: an address plus an optional byte
/// range and request headers. Resolution only ever replaces `uri`; every other
/// field is carried over untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// Address of the media; either a concrete URL or an opaque track reference.
    pub uri: String,
    /// Byte offset the engine wants to start reading from.
    pub position: u64,
    /// Number of bytes requested, `None` for "until end of stream".
    pub length: Option<u64>,
    /// Extra request headers forwarded to the transport.
    pub headers: HashMap<String, String>,
    /// Cache key the engine uses for this entry, if any.
    pub key: Option<String>,
}

impl FetchRequest {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            position: 0,
            length: None,
            headers: HashMap::new(),
            key: None,
        }
    }

    /// Returns a copy of this request pointing at a different address.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    pub fn with_range(mut self, position: u64, length: Option<u64>) -> Self {
        self.position = position;
        self.length = length;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

/// Transport commands the core issues to the host player.
///
/// Implementations are owned by the core's control-path task and are only
/// ever called from that task, one command at a time.
pub trait PlaybackEngine: Send {
    /// Whether the queue has an entry after the current one.
    fn has_next_entry(&self) -> bool;

    /// Move the queue pointer to the next entry.
    fn advance_to_next(&mut self) -> Result<()>;

    /// (Re)prepare the engine for the current entry.
    fn prepare(&mut self) -> Result<()>;

    /// Start or resume playback.
    fn play(&mut self) -> Result<()>;
}

/// Resolution callback installed into the engine's loading path.
///
/// Called synchronously on the engine's loading thread. Implementations may
/// block that thread but must never call back into the engine from it.
pub trait FetchRequestResolver: Send + Sync {
    /// Returns the request the engine should actually fetch.
    fn resolve(&self, request: FetchRequest) -> Result<FetchRequest>;
}
