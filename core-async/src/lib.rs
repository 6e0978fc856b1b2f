//! Runtime abstraction layer for the Ting playback core.
//!
//! Every other crate in the workspace reaches the async runtime through this
//! crate instead of depending on tokio directly. Keeping the surface in one
//! place makes it obvious which primitives the core relies on:
//!
//! - `task`: spawning onto the runtime and the blocking pool
//! - `runtime`: runtime handles, used by code that lives on host threads
//!   (the engine's loading path) and needs to hand work to the runtime
//! - `sync`: channels and the `CancellationToken` used for session teardown
//! - `time`: `timeout`, `sleep`, `Duration`, `Instant`
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::oneshot;
//! use core_async::task;
//!
//! # async fn example() {
//! let (tx, rx) = oneshot::channel();
//! task::spawn(async move {
//!     let _ = tx.send(42u64);
//! });
//! assert_eq!(rx.await.unwrap(), 42);
//! # }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

/// Re-exported so callers can race a future against cancellation without
/// naming tokio.
pub use tokio::select;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
