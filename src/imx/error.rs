//! Layer-2 client errors.

use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Errors returned by the layer-2 platform client.
#[derive(Debug, Error)]
pub enum Layer2Error {
    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The request never got an answer.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// A stark key could not be parsed.
    #[error("Invalid stark key '{0}'")]
    InvalidStarkKey(String),

    /// The client could not be constructed.
    #[error("Client setup failed: {0}")]
    Setup(String),

    /// On-chain part of an operation failed.
    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

impl Layer2Error {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Short machine-readable name used in logs and API errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Api { .. } => "api",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
            Self::InvalidStarkKey(_) => "invalid_stark_key",
            Self::Setup(_) => "setup",
            Self::Blockchain(_) => "blockchain",
        }
    }
}

impl From<reqwest::Error> for Layer2Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

/// Result type for layer-2 operations.
pub type Layer2Result<T> = Result<T, Layer2Error>;
