//! Synchronization primitives.
//!
//! - `mpsc`: the control-path command queue
//! - `oneshot`: completion signals (lookup results, command replies)
//! - `broadcast`: the event bus
//! - [`CancellationToken`]: session-wide teardown signal; every pending lookup
//!   and the controller loop observe the same token
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::CancellationToken;
//!
//! let session = CancellationToken::new();
//! let lookup = session.child_token();
//! session.cancel();
//! assert!(lookup.is_cancelled());
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};

pub use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};
