//! Pano Send - the post submission page.
//!
//! Serves the form for sharing a link or a text post and handles its
//! submission.
//!
//! # Architecture
//!
//! - **Form**: `GET /send` renders the form with maud; `?url=` pre-fills the
//!   title and content from the link's metadata (moka-cached)
//! - **Submission**: `POST /send` resolves the session, validates and
//!   normalizes the input with `pano_core`, stores the post, and redirects
//!   to it
//! - **Browser**: a small inline script fetches metadata on paste and after
//!   a typing pause, and submits the form in the background so errors show
//!   inline
//!
//! # Security
//!
//! - All dynamic content is HTML-escaped by maud
//! - Content-Security-Policy limits scripts to the inline form script and
//!   network access to this origin and the metadata endpoint
//! - X-Frame-Options: DENY prevents clickjacking
//! - Store failures are logged; clients only see a generic message

pub mod config;
pub mod error;
pub mod meta_client;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::SendError;
pub use routes::router;
pub use state::AppState;
