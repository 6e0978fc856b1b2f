//! # Host Bridge Traits
//!
//! Contracts between the Ting playback core and the host application.
//!
//! ## Overview
//!
//! The core never talks to the player, the network or the host logger
//! directly. Each capability is a trait defined here and implemented by the
//! host (or by `bridge-desktop` for desktop builds and tests).
//!
//! ## Traits
//!
//! ### Playback
//! - [`PlaybackEngine`](playback::PlaybackEngine) - Transport commands the core issues
//!   (has-next, advance, prepare, play)
//! - [`FetchRequestResolver`](playback::FetchRequestResolver) - Callback the core
//!   exposes to the engine's loading path
//!
//! ### Metadata & Networking
//! - [`TrackMetadataSource`](metadata::TrackMetadataSource) - Track id → stream of
//!   candidate playback URLs
//! - [`HttpClient`](http::HttpClient) - Async HTTP with retry
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it with actionable messages.
//!
//! ## Thread Safety
//!
//! Shared capabilities (`TrackMetadataSource`, `HttpClient`, `Clock`,
//! `LoggerSink`, `FetchRequestResolver`) are `Send + Sync`. `PlaybackEngine`
//! is only `Send`: it is owned by a single control-path task and never shared.

pub mod error;
pub mod http;
pub mod metadata;
pub mod playback;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use metadata::{MusicUrl, MusicUrlBatch, MusicUrlStream, TrackMetadataSource};
pub use playback::{FetchRequest, FetchRequestResolver, PlaybackEngine};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
