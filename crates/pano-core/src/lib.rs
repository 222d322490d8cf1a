//! Core types and rules for the pano post submission route.
//!
//! This crate provides:
//! - Submission validation with localized error messages
//! - Link validation and normalization
//! - URL slugs, the post model, and the [`PostStore`] persistence seam
//! - The link metadata model, the [`MetadataSource`] seam, and the form's
//!   debounced pre-fill behavior
//! - Prometheus metrics helpers
//! - Shared error types

mod error;
pub mod meta;
pub mod metrics;
pub mod normalize;
pub mod post;
pub mod prefill;
pub mod slug;
mod submission;
pub mod validate;

pub use error::{Error, ErrorBody, ErrorEnvelope, Result};
pub use meta::{Meta, MetaError, MetaResponse, MetadataSource};
pub use normalize::{NormalizeOptions, normalize_url, normalize_url_with_opts};
pub use post::{InMemoryPostStore, NewPost, Post, PostStore, StoreError, UserId};
pub use prefill::{DEFAULT_DEBOUNCE, Debouncer, FormState, PrefillController};
pub use slug::slugify;
pub use submission::{SubmissionInput, ValidSubmission, ValidationError};
