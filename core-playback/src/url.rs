//! Secure-transport normalization of resolved track URLs.
//!
//! The music API frequently reports `http://` CDN addresses; the same paths
//! are served over https and Android blocks cleartext traffic by default.

use ::url::{ParseError, Url};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("Malformed URL '{input}': {source}")]
    Parse {
        input: String,
        #[source]
        source: ParseError,
    },

    #[error("Cannot switch scheme '{0}' to https")]
    UnsupportedScheme(String),
}

/// Returns `input` with its scheme forced to `https`.
///
/// Host, path, query and fragment are preserved. An explicit port is kept
/// unless it is the https default, in which case it is dropped.
///
/// ```
/// use core_playback::url::to_https;
///
/// assert_eq!(to_https("http://a.example/x.mp3").unwrap(), "https://a.example/x.mp3");
/// ```
pub fn to_https(input: &str) -> Result<String, UrlError> {
    let mut url = Url::parse(input.trim()).map_err(|source| UrlError::Parse {
        input: input.to_string(),
        source,
    })?;

    if url.scheme() != "https" {
        let original = url.scheme().to_string();
        url.set_scheme("https")
            .map_err(|_| UrlError::UnsupportedScheme(original.clone()))?;

        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::UnsupportedScheme(original));
        }
    }

    Ok(url.into())
}

/// Host component of a URL, if it parses and has one.
pub fn host_of(input: &str) -> Option<String> {
    Url::parse(input)
        .ok()
        .and_then(|url| url.host_str().map(str::to_owned))
}
