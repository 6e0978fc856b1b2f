//! # Core Configuration Module
//!
//! Provides configuration management for the Ting playback core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that holds the bridges and settings the core needs. It enforces
//! fail-fast validation so a misconfigured session never starts.
//!
//! ## Required Settings
//!
//! - `api_base_url` - Base URL of the music API (`http` or `https`)
//!
//! ## Optional Dependencies (with platform defaults)
//!
//! - `HttpClient` - HTTP operations (desktop default: reqwest)
//! - `Clock` - Time source for cache expiry (default: system clock)
//!
//! When the `desktop-shims` feature is disabled and no `HttpClient` is
//! injected, `build()` returns [`Error::CapabilityMissing`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, ResolverSettings};
//! use std::time::Duration;
//!
//! let config = CoreConfig::builder()
//!     .api_base_url("https://music.example.com/api")
//!     .resolver(ResolverSettings::default().with_lookup_timeout(Duration::from_secs(5)))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // Missing api_base_url
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing api base url");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{Clock, HttpClient, SystemClock};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Upper bound for the blocking wait on a metadata lookup.
const MAX_LOOKUP_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound for the event bus buffer.
const MAX_EVENT_BUFFER_SIZE: usize = 16_384;

/// Core configuration for the Ting playback core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Base URL of the music API, e.g. `https://music.example.com/api`
    pub api_base_url: Url,

    /// HTTP client used by the metadata source
    pub http_client: Arc<dyn HttpClient>,

    /// Time source for cache expiry
    pub clock: Arc<dyn Clock>,

    /// Loading-path resolver settings
    pub resolver: ResolverSettings,

    /// URL cache settings
    pub cache: CacheSettings,

    /// Capacity of the event bus buffer
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field("http_client", &"HttpClient { ... }")
            .field("clock", &"Clock { ... }")
            .field("resolver", &self.resolver)
            .field("cache", &self.cache)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

/// Settings for the loading-path resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    /// How long the loading thread waits for a lookup before treating the
    /// track as unresolvable.
    ///
    /// Default: 10 seconds
    pub lookup_timeout: Duration,

    /// Bitrate requested from the music API, in bits per second.
    ///
    /// Default: 320000
    pub preferred_bitrate: u32,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            lookup_timeout: Duration::from_secs(10),
            preferred_bitrate: 320_000,
        }
    }
}

impl ResolverSettings {
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn with_preferred_bitrate(mut self, bitrate: u32) -> Self {
        self.preferred_bitrate = bitrate;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.lookup_timeout.is_zero() {
            return Err(Error::Config(
                "Lookup timeout must be greater than 0".to_string(),
            ));
        }

        if self.lookup_timeout > MAX_LOOKUP_TIMEOUT {
            return Err(Error::Config(format!(
                "Lookup timeout exceeds maximum of {} seconds",
                MAX_LOOKUP_TIMEOUT.as_secs()
            )));
        }

        if self.preferred_bitrate == 0 {
            return Err(Error::Config(
                "Preferred bitrate must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Settings for the track URL cache.
///
/// Resolved URLs are signed and expire on the server side, so entries carry
/// a time-to-live in addition to the LRU bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Maximum number of cached tracks.
    ///
    /// Default: 256
    pub capacity: usize,

    /// How long a cached URL stays usable.
    ///
    /// Default: 10 minutes
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: 256,
            ttl: Duration::from_secs(10 * 60),
        }
    }
}

impl CacheSettings {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::Config(
                "Cache capacity must be greater than 0".to_string(),
            ));
        }

        if self.ttl.is_zero() {
            return Err(Error::Config("Cache TTL must be greater than 0".to_string()));
        }

        Ok(())
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - The API base URL uses `http` or `https` and has a host
    /// - Resolver and cache settings are in range
    /// - The event buffer size is in range
    pub fn validate(&self) -> Result<()> {
        match self.api_base_url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(Error::Config(format!(
                    "API base URL must use http or https, got '{}'",
                    other
                )))
            }
        }

        if self.api_base_url.host_str().map_or(true, str::is_empty) {
            return Err(Error::Config("API base URL must have a host".to_string()));
        }

        self.resolver.validate()?;
        self.cache.validate()?;

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        Ok(())
    }

    /// Base URL as a string without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base_url.as_str().trim_end_matches('/')
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new().map_err(|e| {
        Error::Internal(format!("Failed to initialize default HttpClient: {}", e))
    })?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "HttpClient implementation is required to reach the music API. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Android: inject an OkHttp-backed client through the host bridge."
            .to_string(),
    })
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    api_base_url: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    clock: Option<Arc<dyn Clock>>,
    resolver: Option<ResolverSettings>,
    cache: Option<CacheSettings>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the base URL of the music API (required).
    ///
    /// ```
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder()
    ///     .api_base_url("https://music.example.com/api");
    /// ```
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Sets the HTTP client implementation.
    ///
    /// If not provided, the desktop default (reqwest-based) will be used when
    /// the `desktop-shims` feature is enabled.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Sets the clock used for cache expiry. Defaults to the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn resolver(mut self, settings: ResolverSettings) -> Self {
        self.resolver = Some(settings);
        self
    }

    /// Shorthand for overriding only the lookup timeout.
    pub fn lookup_timeout(mut self, timeout: Duration) -> Self {
        let settings = self.resolver.unwrap_or_default();
        self.resolver = Some(settings.with_lookup_timeout(timeout));
        self
    }

    pub fn cache(mut self, settings: CacheSettings) -> Self {
        self.cache = Some(settings);
        self
    }

    /// Sets the event bus buffer size.
    ///
    /// Default: 64
    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Returns an error if:
    /// - `api_base_url` is missing or not a valid URL
    /// - No `HttpClient` was injected and no platform default exists
    /// - Any setting is out of range
    pub fn build(self) -> Result<CoreConfig> {
        let raw_url = self.api_base_url.ok_or_else(|| {
            Error::Config(
                "API base URL is required. Use .api_base_url() to set it.".to_string(),
            )
        })?;

        let api_base_url = Url::parse(raw_url.trim()).map_err(|e| {
            Error::Config(format!("Invalid API base URL '{}': {}", raw_url, e))
        })?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);

        let config = CoreConfig {
            api_base_url,
            http_client,
            clock,
            resolver: self.resolver.unwrap_or_default(),
            cache: self.cache.unwrap_or_default(),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{BridgeError, HttpRequest, HttpResponse, RetryPolicy};

    struct MockHttpClient;

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            Err(BridgeError::NotAvailable("offline".to_string()))
        }

        async fn execute_with_retry(
            &self,
            request: HttpRequest,
            _policy: RetryPolicy,
        ) -> BridgeResult<HttpResponse> {
            self.execute(request).await
        }
    }

    fn builder() -> CoreConfigBuilder {
        CoreConfig::builder()
            .api_base_url("https://music.example.com/api/")
            .http_client(Arc::new(MockHttpClient))
    }

    #[test]
    fn test_builder_with_defaults() {
        let config = builder().build().unwrap();

        assert_eq!(config.api_base(), "https://music.example.com/api");
        assert_eq!(config.resolver, ResolverSettings::default());
        assert_eq!(config.resolver.lookup_timeout, Duration::from_secs(10));
        assert_eq!(config.cache, CacheSettings::default());
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn test_builder_custom_settings() {
        let config = builder()
            .resolver(ResolverSettings::default().with_preferred_bitrate(128_000))
            .lookup_timeout(Duration::from_secs(3))
            .cache(CacheSettings::default().with_capacity(8).with_ttl(Duration::from_secs(30)))
            .event_buffer_size(8)
            .build()
            .unwrap();

        assert_eq!(config.resolver.lookup_timeout, Duration::from_secs(3));
        assert_eq!(config.resolver.preferred_bitrate, 128_000);
        assert_eq!(config.cache.capacity, 8);
        assert_eq!(config.cache.ttl, Duration::from_secs(30));
        assert_eq!(config.event_buffer_size, 8);
    }

    #[test]
    fn test_missing_api_base_url() {
        let result = CoreConfig::builder()
            .http_client(Arc::new(MockHttpClient))
            .build();
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("API base URL is required")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_api_base_url() {
        let result = CoreConfig::builder()
            .api_base_url("not a url")
            .http_client(Arc::new(MockHttpClient))
            .build();
        assert!(matches!(result, Err(Error::Config(_))));

        let result = CoreConfig::builder()
            .api_base_url("ftp://music.example.com")
            .http_client(Arc::new(MockHttpClient))
            .build();
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("http or https")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_settings() {
        let zero_timeout = builder().lookup_timeout(Duration::ZERO).build();
        assert!(matches!(zero_timeout, Err(Error::Config(_))));

        let huge_timeout = builder().lookup_timeout(Duration::from_secs(600)).build();
        assert!(matches!(huge_timeout, Err(Error::Config(_))));

        let empty_cache = builder()
            .cache(CacheSettings::default().with_capacity(0))
            .build();
        assert!(matches!(empty_cache, Err(Error::Config(_))));

        let zero_ttl = builder()
            .cache(CacheSettings::default().with_ttl(Duration::ZERO))
            .build();
        assert!(matches!(zero_ttl, Err(Error::Config(_))));

        let no_buffer = builder().event_buffer_size(0).build();
        assert!(matches!(no_buffer, Err(Error::Config(_))));

        let zero_bitrate = builder()
            .resolver(ResolverSettings::default().with_preferred_bitrate(0))
            .build();
        assert!(matches!(zero_bitrate, Err(Error::Config(_))));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_missing_http_client_without_shims() {
        let result = CoreConfig::builder()
            .api_base_url("https://music.example.com")
            .build();
        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "HttpClient")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_desktop_shims_provide_http_client() {
        let config = CoreConfig::builder()
            .api_base_url("https://music.example.com")
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_debug_hides_bridges() {
        let config = builder().build().unwrap();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("HttpClient { ... }"));
        assert!(rendered.contains("music.example.com"));
    }
}
