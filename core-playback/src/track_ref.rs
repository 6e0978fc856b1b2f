//! Track reference codec.
//!
//! Queue entries do not carry streaming URLs; those are signed and expire.
//! Instead each entry's address is a reference such as
//! `ting://music?id=12345` that the resolver turns into a concrete URL right
//! before the engine fetches bytes.

use crate::error::{PlaybackError, Result};
use ::url::Url;
use std::fmt;

/// Scheme token marking an address as "needs resolution".
pub const TRACK_SCHEME: &str = "ting";

/// Query parameter carrying the numeric track id.
const ID_PARAM: &str = "id";

/// Kind of resolvable reference, encoded in the host tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Music,
}

impl ReferenceKind {
    pub fn host(&self) -> &'static str {
        match self {
            ReferenceKind::Music => "music",
        }
    }

    fn from_host(host: &str) -> Option<Self> {
        if host.eq_ignore_ascii_case("music") {
            Some(ReferenceKind::Music)
        } else {
            None
        }
    }
}

/// An immutable, resolvable track address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackReference {
    kind: ReferenceKind,
    id: u64,
}

impl TrackReference {
    pub fn music(id: u64) -> Self {
        Self {
            kind: ReferenceKind::Music,
            id,
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Renders the reference as it is stored in the queue.
    pub fn to_uri(&self) -> String {
        format!(
            "{}://{}?{}={}",
            TRACK_SCHEME,
            self.kind.host(),
            ID_PARAM,
            self.id
        )
    }

    /// Classifies an engine address.
    ///
    /// - `Ok(None)`: not a track reference (any other URL, or not a URL at
    ///   all); the caller passes it through untouched.
    /// - `Ok(Some(_))`: a well-formed reference.
    /// - `Err(InvalidTrackReference)`: scheme and host match but the id is
    ///   missing or not a non-negative integer.
    ///
    /// ```
    /// use core_playback::track_ref::TrackReference;
    ///
    /// let reference = TrackReference::parse("ting://music?id=42").unwrap().unwrap();
    /// assert_eq!(reference.id(), 42);
    /// assert!(TrackReference::parse("https://a.example/x.mp3").unwrap().is_none());
    /// ```
    pub fn parse(address: &str) -> Result<Option<Self>> {
        let url = match Url::parse(address.trim()) {
            Ok(url) => url,
            Err(_) => return Ok(None),
        };

        if url.scheme() != TRACK_SCHEME {
            return Ok(None);
        }

        let kind = match url.host_str().and_then(ReferenceKind::from_host) {
            Some(kind) => kind,
            None => return Ok(None),
        };

        let raw_id = url
            .query_pairs()
            .find(|(key, _)| key == ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| PlaybackError::invalid_reference(address, "missing id"))?;

        let id = raw_id.trim().parse::<u64>().map_err(|_| {
            PlaybackError::invalid_reference(address, format!("id '{}' is not numeric", raw_id))
        })?;

        Ok(Some(Self { kind, id }))
    }
}

impl fmt::Display for TrackReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_uri())
    }
}
