//! # Core Runtime Module
//!
//! Foundational runtime infrastructure shared by the Ting playback core:
//! - Logging and tracing setup
//! - Configuration with fail-fast validation
//! - Event bus for playback and resolution events
//!
//! Domain crates (`core-metadata`, `core-playback`) depend on this crate for
//! their ambient concerns; hosts only touch it to initialize logging and to
//! build a [`CoreConfig`](config::CoreConfig).

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
