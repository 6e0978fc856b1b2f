//! Music API Client
//!
//! Fetches playable URLs for a track from the music API.
//!
//! ## API Endpoint
//!
//! - **Song URL**: `{base}/song/url?id={id}&br={bitrate}`
//!
//! ```json
//! { "code": 200, "data": [{ "id": 42, "url": "http://...", "br": 320000, "size": 1, "type": "mp3" }] }
//! ```
//!
//! `url` is `null` when the track is not playable (region lock, paid only,
//! removed). That case is a successful response with an unusable candidate,
//! not an error.

use crate::error::{MetadataError, Result};
use bridge_traits::error::BridgeError;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest};
use bridge_traits::metadata::{MusicUrl, MusicUrlBatch, MusicUrlStream, TrackMetadataSource};
use core_runtime::config::CoreConfig;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Timeout for a single API request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const API_SUCCESS_CODE: i64 = 200;

#[derive(Debug, Deserialize)]
struct SongUrlResponse {
    code: i64,
    #[serde(default)]
    data: Vec<MusicUrl>,
}

/// Music API client
///
/// Cheap to clone; clones share the underlying HTTP client.
#[derive(Clone)]
pub struct MusicUrlApi {
    http_client: Arc<dyn HttpClient>,
    base_url: Arc<str>,
    bitrate: u32,
}

impl MusicUrlApi {
    /// Creates a new client.
    ///
    /// * `base_url` - API root, with or without a trailing slash
    /// * `bitrate` - Requested bitrate in bits per second
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl AsRef<str>, bitrate: u32) -> Self {
        Self {
            http_client,
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
            bitrate,
        }
    }

    pub fn from_config(config: &CoreConfig) -> Self {
        Self::new(
            Arc::clone(&config.http_client),
            config.api_base(),
            config.resolver.preferred_bitrate,
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/song/url", self.base_url)
    }

    /// Fetches the candidate URLs of a track.
    ///
    /// # Returns
    ///
    /// - `Ok(batch)` - API answered with code 200 (the batch may be empty or
    ///   hold candidates without a URL)
    /// - `Err` - Transport failure, non-2xx status, API error code or
    ///   malformed body
    #[instrument(skip(self), fields(bitrate = self.bitrate))]
    pub async fn fetch(&self, track_id: u64) -> Result<MusicUrlBatch> {
        let request = HttpRequest::new(HttpMethod::Get, self.endpoint())
            .query("id", track_id)
            .query("br", self.bitrate)
            .header("Accept", "application/json")
            .timeout(REQUEST_TIMEOUT);

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            warn!(status = response.status, "Music API request failed");
            return Err(MetadataError::Http {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).into_owned(),
            });
        }

        let parsed: SongUrlResponse = serde_json::from_slice(&response.body)
            .map_err(|e| MetadataError::Decode(format!("song/url response: {}", e)))?;

        if parsed.code != API_SUCCESS_CODE {
            warn!(code = parsed.code, "Music API returned error code");
            return Err(MetadataError::Api { code: parsed.code });
        }

        debug!(candidates = parsed.data.len(), "Fetched track urls");
        Ok(MusicUrlBatch::new(parsed.data))
    }
}

impl TrackMetadataSource for MusicUrlApi {
    fn lookup(&self, track_id: u64) -> MusicUrlStream {
        let api = self.clone();
        stream::once(async move { api.fetch(track_id).await.map_err(BridgeError::from) }).boxed()
    }
}

impl std::fmt::Debug for MusicUrlApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicUrlApi")
            .field("base_url", &self.base_url)
            .field("bitrate", &self.bitrate)
            .finish()
    }
}
