//! Time utilities.
//!
//! `timeout` bounds the resolver's wait on a metadata lookup; `Instant` is
//! used for lookup latency in logs.

pub use tokio::time::{error::Elapsed, interval, sleep, sleep_until, timeout, Interval, Sleep, Timeout};

pub use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
