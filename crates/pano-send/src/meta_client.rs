//! Client for the link metadata endpoint.
//!
//! The endpoint takes a form-encoded `url` field and answers with a
//! [`MetaResponse`]. [`lookup`] adds the in-process cache and metrics on top
//! of whichever [`MetadataSource`] the state holds.

use std::time::Duration;

use async_trait::async_trait;
use pano_core::metrics::{record_meta_cache_hit, record_meta_fetch};
use pano_core::{Meta, MetaError, MetaResponse, MetadataSource};
use reqwest::header::ACCEPT;

use crate::state::AppState;

/// [`MetadataSource`] backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpMetaSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMetaSource {
    /// Create a client posting to `endpoint` with the given request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pano-send/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl MetadataSource for HttpMetaSource {
    async fn fetch(&self, url: &str) -> Result<Meta, MetaError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .form(&[("url", url)])
            .send()
            .await
            .map_err(|e| MetaError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MetaError::Transport(e.to_string()))?;

        // An { error } body is meaningful whatever the status code.
        match MetaResponse::from_json(&body) {
            Ok(parsed) => parsed.into_result().map_err(MetaError::Rejected),
            Err(_) if !status.is_success() => {
                Err(MetaError::Transport(format!("endpoint returned {status}")))
            }
            Err(e) => Err(MetaError::Decode(e.to_string())),
        }
    }
}

/// Look up metadata for `url`, serving repeated URLs from the cache.
///
/// Only successful lookups are cached.
pub async fn lookup(state: &AppState, url: &str) -> Result<Meta, MetaError> {
    let key = url.trim();

    if let Some(meta) = state.meta_cache.get(key).await {
        record_meta_cache_hit();
        tracing::debug!(url = %key, "metadata cache hit");
        return Ok(meta);
    }

    match state.meta.fetch(key).await {
        Ok(meta) => {
            record_meta_fetch("ok");
            state.meta_cache.insert(key.to_string(), meta.clone()).await;
            Ok(meta)
        }
        Err(err) => {
            record_meta_fetch(err.code());
            tracing::warn!(url = %key, error = %err, "metadata lookup failed");
            Err(err)
        }
    }
}
