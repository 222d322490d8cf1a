//! Application configuration loaded from environment variables.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pano_core::UserId;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:3000").
    pub bind_addr: String,

    /// Public base URL of the site, without trailing slash.
    pub base_url: String,

    /// Site name shown in page titles.
    pub site_name: String,

    /// Metadata endpoint the form posts pasted links to. A path is relative
    /// to `base_url`.
    pub meta_endpoint: String,

    /// Timeout for server-side metadata requests.
    pub meta_timeout: Duration,

    /// Quiet period after typing in the URL field before metadata is fetched.
    pub debounce: Duration,

    /// Session tokens mapped to the user they authenticate.
    pub session_tokens: Arc<HashMap<String, UserId>>,

    /// Port for the Prometheus `/metrics` listener; disabled when unset.
    pub metrics_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            base_url: "http://localhost:3000".to_string(),
            site_name: "Pano".to_string(),
            meta_endpoint: "/api/parse-meta".to_string(),
            meta_timeout: Duration::from_secs(5),
            debounce: pano_core::DEFAULT_DEBOUNCE,
            session_tokens: Arc::new(HashMap::new()),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `PANO_BIND_ADDR`: Server bind address (default: "0.0.0.0:3000")
    /// - `PANO_BASE_URL`: Public base URL (default: "http://localhost:3000")
    /// - `PANO_SITE_NAME`: Site name (default: "Pano")
    /// - `PANO_META_ENDPOINT`: Metadata endpoint (default: "/api/parse-meta")
    /// - `PANO_META_TIMEOUT_SECS`: Metadata request timeout (default: 5)
    /// - `PANO_DEBOUNCE_MS`: URL field debounce (default: 1500)
    /// - `PANO_SESSION_TOKENS`: Comma-separated `token=user_id` pairs
    /// - `PANO_METRICS_PORT`: Enables the Prometheus listener on this port
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = std::env::var("PANO_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let base_url = std::env::var("PANO_BASE_URL")
            .unwrap_or(defaults.base_url)
            .trim_end_matches('/')
            .to_string();

        let site_name = std::env::var("PANO_SITE_NAME").unwrap_or(defaults.site_name);

        let meta_endpoint = std::env::var("PANO_META_ENDPOINT")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.meta_endpoint);

        let meta_timeout = match std::env::var("PANO_META_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("PANO_META_TIMEOUT_SECS is not a number: {raw}"))?,
            ),
            Err(_) => defaults.meta_timeout,
        };

        let debounce = match std::env::var("PANO_DEBOUNCE_MS") {
            Ok(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .with_context(|| format!("PANO_DEBOUNCE_MS is not a number: {raw}"))?,
            ),
            Err(_) => defaults.debounce,
        };

        let session_tokens =
            parse_session_tokens(&std::env::var("PANO_SESSION_TOKENS").unwrap_or_default());

        let metrics_port = match std::env::var("PANO_METRICS_PORT") {
            Ok(raw) => Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("PANO_METRICS_PORT is not a port: {raw}"))?,
            ),
            Err(_) => None,
        };

        if session_tokens.is_empty() {
            tracing::warn!("PANO_SESSION_TOKENS is empty; every submission will be sent to login");
        }

        tracing::info!(
            bind_addr = %bind_addr,
            base_url = %base_url,
            site_name = %site_name,
            meta_endpoint = %meta_endpoint,
            debounce_ms = debounce.as_millis() as u64,
            session_count = session_tokens.len(),
            metrics_port = ?metrics_port,
            "send configuration loaded"
        );

        Ok(Self {
            bind_addr,
            base_url,
            site_name,
            meta_endpoint,
            meta_timeout,
            debounce,
            session_tokens: Arc::new(session_tokens),
            metrics_port,
        })
    }

    /// Absolute URL of the metadata endpoint, for server-side requests.
    pub fn meta_fetch_url(&self) -> String {
        if self.meta_endpoint.starts_with('/') {
            format!("{}{}", self.base_url, self.meta_endpoint)
        } else {
            self.meta_endpoint.clone()
        }
    }
}

/// Parse `token=user,token2=user2`. Malformed pairs are skipped.
fn parse_session_tokens(raw: &str) -> HashMap<String, UserId> {
    raw.split(',')
        .filter_map(|pair| {
            let (token, user) = pair.split_once('=')?;
            let (token, user) = (token.trim(), user.trim());
            (!token.is_empty() && !user.is_empty())
                .then(|| (token.to_string(), UserId::from(user)))
        })
        .collect()
}
