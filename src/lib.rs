//! Workspace placeholder crate.
//!
//! Exposes feature flags that map to the individual workspace crates so a host
//! application can depend on `ting-workspace` alone. The default
//! `desktop-shims` feature pulls in `core-service` with the reqwest-backed
//! HTTP bridge; `playback-only` and `metadata-only` expose the lower layers
//! for hosts that wire their own bridges.

#[cfg(feature = "desktop-shims")]
pub use core_service as service;

#[cfg(feature = "playback-only")]
pub use core_playback as playback;

#[cfg(feature = "metadata-only")]
pub use core_metadata as metadata;
