//! # Desktop Bridge Implementations
//!
//! Default bridge implementations for desktop hosts and integration tests.
//!
//! - `HttpClient` using `reqwest` with retry and exponential backoff
//!
//! The playback engine itself is always host-provided; there is no desktop
//! default for it.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! let config = CoreConfig::builder()
//!     .api_base_url("https://music-api.example.com")
//!     .http_client(http_client)
//!     .build()?;
//! ```

mod http;

pub use http::ReqwestHttpClient;
