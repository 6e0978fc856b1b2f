//! # Track Metadata Module
//!
//! Looks up playable URLs for track ids.
//!
//! ## Overview
//!
//! This module handles:
//! - Querying the music API for a track's candidate URLs ([`MusicUrlApi`])
//! - Caching playable results for their lifetime ([`CachedMusicUrlSource`])
//!
//! Both implement [`TrackMetadataSource`](bridge_traits::TrackMetadataSource),
//! so the cache can wrap the API (or any other source) transparently.

pub mod api;
pub mod cache;
pub mod error;

pub use api::MusicUrlApi;
pub use cache::CachedMusicUrlSource;
pub use error::{MetadataError, Result};
