//! Page metadata used to pre-fill the submission form.
//!
//! The metadata endpoint accepts a form field `url` and answers with either
//! `{ "meta": { "title": ..., "description": ... } }` or
//! `{ "error": { "message": ... } }`. Its contents are not validated; they
//! only seed default values the user can edit.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorBody, Result};

/// Title and description of a linked page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Meta {
    /// Default value for the title field.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Default value for the content field.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Response body of the metadata endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaResponse {
    Meta { meta: Meta },
    Error { error: ErrorBody },
}

impl MetaResponse {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Convert into the metadata, or the endpoint's error message.
    pub fn into_result(self) -> std::result::Result<Meta, String> {
        match self {
            Self::Meta { meta } => Ok(meta),
            Self::Error { error } => Err(error.message),
        }
    }
}

/// Errors raised while fetching metadata.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// The endpoint answered with an `{ error }` body.
    #[error("{0}")]
    Rejected(String),

    /// The request could not be completed.
    #[error("metadata request failed: {0}")]
    Transport(String),

    /// The endpoint answered with something we could not parse.
    #[error("unexpected metadata response: {0}")]
    Decode(String),
}

impl MetaError {
    /// Message suitable for showing next to the form.
    ///
    /// Messages from the endpoint are passed through; transport and decode
    /// failures get a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) => message.clone(),
            Self::Transport(_) | Self::Decode(_) => {
                "Bağlantı bilgileri alınamadı.".to_string()
            }
        }
    }

    /// Short machine-readable code, used as a metrics label.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Rejected(_) => "rejected",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
        }
    }
}

/// Source of page metadata for a link.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Fetch the title and description of the page at `url`.
    async fn fetch(&self, url: &str) -> std::result::Result<Meta, MetaError>;
}
