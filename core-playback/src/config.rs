//! # Resolver Configuration

use core_runtime::config::ResolverSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for [`TrackAddressResolver`](crate::resolver::TrackAddressResolver).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Upper bound on how long the loading thread waits for a lookup.
    ///
    /// A lookup that has not produced a usable URL in time is treated as
    /// unresolvable and triggers the fallback skip.
    ///
    /// Default: 10 seconds.
    #[serde(default = "default_lookup_timeout")]
    pub lookup_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            lookup_timeout: default_lookup_timeout(),
        }
    }
}

impl ResolverConfig {
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.lookup_timeout.is_zero() {
            return Err("lookup_timeout must be > 0".to_string());
        }
        Ok(())
    }
}

impl From<&ResolverSettings> for ResolverConfig {
    fn from(settings: &ResolverSettings) -> Self {
        Self {
            lookup_timeout: settings.lookup_timeout,
        }
    }
}

fn default_lookup_timeout() -> Duration {
    Duration::from_secs(10)
}
