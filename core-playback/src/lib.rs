//! # Playback Resolution Module
//!
//! Turns opaque track references in the player queue into playable URLs at
//! the moment the engine needs bytes, and keeps the queue moving when a track
//! cannot be resolved.
//!
//! ## Overview
//!
//! This module handles:
//! - Track reference encoding (`ting://music?id=N`)
//! - Upgrading resolved URLs to https
//! - The resolver installed into the engine's loading path
//! - The control-path task that owns the engine and performs fallback skips
//! - Session lifecycle (start, shutdown, cancellation of pending work)
//!
//! ## Threads
//!
//! ```text
//!  engine loading thread          runtime                     control task
//!  ─────────────────────          ───────                     ────────────
//!  resolve(request) ──spawn──▶ lookup (stream)
//!       │ blocking_recv ◀──oneshot── first usable url
//!       │                              or none ──SkipUnresolvable──▶ advance/prepare/play
//!       ▼
//!  request' (https url or unchanged)
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod resolver;
pub mod session;
pub mod track_ref;
pub mod url;

pub use config::ResolverConfig;
pub use controller::{ControlHandle, PlayerCommand, PlayerController};
pub use error::{PlaybackError, Result};
pub use resolver::TrackAddressResolver;
pub use session::PlaybackSession;
pub use track_ref::{ReferenceKind, TrackReference, TRACK_SCHEME};
pub use self::url::{to_https, UrlError};
