//! Fakes shared by the unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pano_core::{
    InMemoryPostStore, Meta, MetaError, MetadataSource, NewPost, Post, PostStore, StoreError,
    UserId,
};

use crate::config::Config;
use crate::state::AppState;

/// Token accepted by [`test_config`], mapped to `user-1`.
pub const TEST_TOKEN: &str = "test-token";

/// Metadata source answering from the URL itself. URLs containing `broken`
/// are rejected.
#[derive(Debug, Default)]
pub struct StaticMeta {
    calls: AtomicUsize,
}

impl StaticMeta {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataSource for StaticMeta {
    async fn fetch(&self, url: &str) -> Result<Meta, MetaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("broken") {
            return Err(MetaError::Rejected("Sayfa okunamadı".to_string()));
        }
        Ok(Meta {
            title: Some(format!("title of {url}")),
            description: Some(format!("about {url}")),
        })
    }
}

/// Post store that always fails with a detailed internal error.
#[derive(Debug, Default)]
pub struct FailingStore {
    calls: AtomicUsize,
}

impl FailingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PostStore for FailingStore {
    async fn create_post(&self, _post: NewPost) -> Result<Post, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable(
            "connection refused: db.internal:5432".to_string(),
        ))
    }
}

/// Default config with [`TEST_TOKEN`] registered.
pub fn test_config() -> Config {
    let mut tokens = HashMap::new();
    tokens.insert(TEST_TOKEN.to_string(), UserId::from("user-1"));
    Config {
        session_tokens: Arc::new(tokens),
        ..Config::default()
    }
}

/// State with an empty in-memory store.
pub fn test_state(meta: Arc<dyn MetadataSource>) -> AppState {
    test_state_with(Arc::new(InMemoryPostStore::new()), meta)
}

/// State with explicit backends.
pub fn test_state_with(posts: Arc<dyn PostStore>, meta: Arc<dyn MetadataSource>) -> AppState {
    AppState::with_backends(test_config(), posts, meta)
}
