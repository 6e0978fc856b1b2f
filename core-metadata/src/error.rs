use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Network error: {0}")]
    Network(#[from] BridgeError),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Music API returned code {code}")]
    Api { code: i64 },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, MetadataError>;

impl From<MetadataError> for BridgeError {
    fn from(error: MetadataError) -> Self {
        match error {
            MetadataError::Network(inner) => inner,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}
