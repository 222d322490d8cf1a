//! Error types and the JSON error envelope shared by the pano crates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the core parsing and normalization helpers.
#[derive(Error, Debug)]
pub enum Error {
    /// The URL could not be parsed or uses a scheme we do not accept.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The input as received (trimmed).
        url: String,
        /// Description of what's wrong.
        reason: String,
    },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// Human-readable error carried inside an [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// The `{ "error": { "message": ... } }` shape returned by the submission
/// handler and the metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

impl ErrorEnvelope {
    /// Wrap a message in the envelope.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                message: message.into(),
            },
        }
    }
}
