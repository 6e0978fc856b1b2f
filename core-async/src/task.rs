//! Task spawning.
//!
//! Thin wrappers over `tokio::task`. Spawned futures must be `Send + 'static`
//! because the core runs on a multi-threaded runtime and tasks may migrate
//! between worker threads.
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! # async fn example() {
//! let handle = task::spawn(async { 42 });
//! assert_eq!(handle.await.unwrap(), 42);
//!
//! // Host-style blocking work (e.g. an engine loading thread)
//! let blocking = task::spawn_blocking(|| 7);
//! assert_eq!(blocking.await.unwrap(), 7);
//! # }
//! ```

pub use tokio::task::{spawn_blocking, yield_now, AbortHandle, JoinError, JoinHandle};

/// Spawns a new asynchronous task on the current runtime.
///
/// # Panics
///
/// Panics when called outside of a runtime context. Code running on host
/// threads should spawn through a [`Handle`](crate::runtime::Handle) instead.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
