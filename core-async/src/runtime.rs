//! Runtime handles.
//!
//! The engine's loading path runs on host threads that are not part of the
//! runtime. Components invoked from there capture a [`Handle`] at
//! construction time and use it to spawn work back onto the runtime.

pub use tokio::runtime::{Builder, Handle, Runtime, TryCurrentError};

/// Returns a handle to the runtime the caller is currently running on.
///
/// Unlike `Handle::current`, this does not panic outside a runtime context.
pub fn current_handle() -> Result<Handle, TryCurrentError> {
    Handle::try_current()
}

/// Builds a multi-threaded runtime with all drivers enabled.
///
/// Used by hosts that do not already own a runtime.
pub fn build_multi_thread(worker_threads: usize) -> std::io::Result<Runtime> {
    Builder::new_multi_thread()
        .worker_threads(worker_threads.max(1))
        .thread_name("ting-core")
        .enable_all()
        .build()
}
