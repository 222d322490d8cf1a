//! Application state shared across all request handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use pano_core::{InMemoryPostStore, Meta, MetadataSource, PostStore};

use crate::config::Config;
use crate::meta_client::HttpMetaSource;

/// Type alias for the link metadata cache (trimmed URL -> metadata).
pub type MetaCache = Cache<String, Meta>;

/// Metadata cache capacity (number of entries).
const META_CACHE_CAPACITY: u64 = 10_000;

/// Metadata cache TTL. Page titles rarely change within the hour.
const META_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Where new posts are persisted.
    pub posts: Arc<dyn PostStore>,

    /// Where link metadata comes from for server-side pre-fill.
    pub meta: Arc<dyn MetadataSource>,

    /// In-memory metadata cache keyed by trimmed URL.
    pub meta_cache: MetaCache,
}

impl AppState {
    /// Create application state with the in-memory post store and the
    /// configured HTTP metadata endpoint.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let meta = HttpMetaSource::new(config.meta_fetch_url(), config.meta_timeout)?;
        Ok(Self::with_backends(
            config,
            Arc::new(InMemoryPostStore::new()),
            Arc::new(meta),
        ))
    }

    /// Create application state around explicit backends.
    pub fn with_backends(
        config: Config,
        posts: Arc<dyn PostStore>,
        meta: Arc<dyn MetadataSource>,
    ) -> Self {
        let meta_cache = Cache::builder()
            .max_capacity(META_CACHE_CAPACITY)
            .time_to_live(META_CACHE_TTL)
            .build();

        tracing::info!(
            meta_cache_capacity = META_CACHE_CAPACITY,
            meta_cache_ttl_secs = META_CACHE_TTL.as_secs(),
            "application state initialized"
        );

        Self {
            config: Arc::new(config),
            posts,
            meta,
            meta_cache,
        }
    }
}
