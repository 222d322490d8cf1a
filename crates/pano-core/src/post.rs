//! Posts and the persistence seam used by the submission handler.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::slug::slugify;
use crate::submission::ValidSubmission;

/// Identifier of the user submitting a post, as resolved from the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Everything needed to create a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub author_id: UserId,
    /// Normalized link.
    pub url: Option<String>,
    /// Free-text content.
    pub body: Option<String>,
}

impl NewPost {
    /// Attach the author to a validated submission.
    pub fn from_submission(submission: ValidSubmission, author_id: UserId) -> Self {
        Self {
            title: submission.title,
            author_id,
            url: submission.url,
            body: submission.body,
        }
    }
}

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Opaque identifier assigned by the store.
    pub id: String,
    /// URL slug derived from the title.
    pub slug: String,
    pub title: String,
    pub author_id: UserId,
    pub url: Option<String>,
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Path of the post page: `/posts/{slug}-{id}`.
    pub fn permalink(&self) -> String {
        format!("/posts/{}-{}", self.slug, self.id)
    }
}

/// Errors reported by a [`PostStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused the post (constraint violation, etc.).
    #[error("post rejected by storage: {0}")]
    Rejected(String),
}

/// Persistence for posts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Create a post, returning it with its assigned id and slug.
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;
}

/// Process-local [`PostStore`] with sequential numeric ids.
///
/// Posts live only as long as the process; useful for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    next_id: AtomicU64,
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPostStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored post, oldest first.
    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().clone()
    }

    /// Number of stored posts.
    pub fn len(&self) -> usize {
        self.posts.lock().len()
    }

    /// Whether no post has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.posts.lock().is_empty()
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let post = Post {
            id: id.to_string(),
            slug: slugify(&post.title),
            title: post.title,
            author_id: post.author_id,
            url: post.url,
            body: post.body,
            created_at: Utc::now(),
        };

        tracing::debug!(id = %post.id, slug = %post.slug, "stored post in memory");
        self.posts.lock().push(post.clone());
        Ok(post)
    }
}
