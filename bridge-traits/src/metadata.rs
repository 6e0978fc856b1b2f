//! Track metadata lookup contract.
//!
//! A lookup yields an asynchronous sequence of batches rather than a single
//! value so that implementations can answer from a local cache first and
//! follow up with a fresh network result.

use crate::error::Result;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

/// One playable candidate for a track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicUrl {
    /// Track id the candidate belongs to.
    #[serde(default)]
    pub id: u64,
    /// Playback URL. The music API reports `null` for tracks it cannot serve.
    #[serde(default)]
    pub url: Option<String>,
    /// Bitrate in bits per second.
    #[serde(default)]
    pub br: u64,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    /// Container/codec hint such as `mp3` or `flac`.
    #[serde(default, rename = "type")]
    pub format: Option<String>,
}

impl MusicUrl {
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: Some(url.into()),
            ..Default::default()
        }
    }
}

/// A single result of a lookup: zero or more candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicUrlBatch {
    #[serde(default)]
    pub data: Vec<MusicUrl>,
}

impl MusicUrlBatch {
    pub fn new(data: Vec<MusicUrl>) -> Self {
        Self { data }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// URL of the first candidate, if it carries a non-blank one.
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|candidate| candidate.url.as_deref())
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// Stream returned by [`TrackMetadataSource::lookup`].
pub type MusicUrlStream = BoxStream<'static, Result<MusicUrlBatch>>;

/// Source of playable URLs for a track id.
///
/// The returned stream is lazy: nothing is fetched until it is polled, and
/// consumers are free to drop it after the first useful batch.
pub trait TrackMetadataSource: Send + Sync {
    fn lookup(&self, track_id: u64) -> MusicUrlStream;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_url_takes_first_candidate_only() {
        let batch = MusicUrlBatch::new(vec![
            MusicUrl::new(1, "http://a.example/1.mp3"),
            MusicUrl::new(1, "http://b.example/1.mp3"),
        ]);
        assert_eq!(batch.first_url(), Some("http://a.example/1.mp3"));
    }

    #[test]
    fn test_first_url_blank_or_missing() {
        let missing = MusicUrlBatch::new(vec![MusicUrl {
            id: 1,
            ..Default::default()
        }]);
        assert_eq!(missing.first_url(), None);

        let blank = MusicUrlBatch::new(vec![MusicUrl::new(1, "  ")]);
        assert_eq!(blank.first_url(), None);

        assert_eq!(MusicUrlBatch::empty().first_url(), None);
    }

    #[test]
    fn test_deserialize_api_payload() {
        let json = r#"{
            "data": [
                {"id": 42, "url": "http://m7.music.example/42.mp3", "br": 128000, "size": 4096, "type": "mp3", "md5": "abc"},
                {"id": 42, "url": null}
            ],
            "code": 200
        }"#;

        let batch: MusicUrlBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.data.len(), 2);
        assert_eq!(batch.data[0].format.as_deref(), Some("mp3"));
        assert_eq!(batch.data[0].br, 128000);
        assert_eq!(batch.data[1].url, None);
    }
}
