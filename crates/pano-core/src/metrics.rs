//! Prometheus metrics helpers for the pano services.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pano_core::metrics::{start_metrics_server, try_init_metrics};
//!
//! #[tokio::main]
//! async fn main() {
//!     if let Some(handle) = try_init_metrics() {
//!         start_metrics_server(9091, handle).await.unwrap();
//!     }
//!
//!     pano_core::metrics::record_submission("created");
//! }
//! ```
//!
//! # Metric Naming Conventions
//!
//! - Prefix: component name (`send_`)
//! - Suffix: unit or type (`_total`, `_seconds`)
//! - Labels: only low-cardinality outcome codes

use std::net::SocketAddr;
use std::time::Duration;

use axum::{Router, routing::get};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Submissions handled, labelled by `outcome`.
pub const SUBMISSIONS_TOTAL: &str = "send_submissions_total";
/// Time spent in the post store.
pub const POST_CREATE_DURATION: &str = "send_post_create_duration_seconds";
/// Metadata fetches, labelled by `outcome`.
pub const META_FETCH_TOTAL: &str = "send_meta_fetch_total";
/// Metadata lookups answered from the in-process cache.
pub const META_CACHE_HITS_TOTAL: &str = "send_meta_cache_hits_total";

/// Install the Prometheus metrics recorder.
///
/// Call once at startup before any metrics are recorded. Returns `None` if
/// a recorder is already installed.
pub fn try_init_metrics() -> Option<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder().ok()?;
    register_send_metrics();
    Some(handle)
}

/// Start the Prometheus metrics HTTP server.
///
/// Binds `0.0.0.0:{port}` before returning, then serves `/metrics` from a
/// background task.
pub async fn start_metrics_server(
    port: u16,
    handle: PrometheusHandle,
) -> Result<(), std::io::Error> {
    let app = Router::new().route(
        "/metrics",
        get(move || {
            let handle = handle.clone();
            async move { handle.render() }
        }),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Metrics server listening on http://{}/metrics", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "metrics server stopped");
        }
    });

    Ok(())
}

/// Register descriptions for the send route metrics.
fn register_send_metrics() {
    describe_counter!(
        SUBMISSIONS_TOTAL,
        "Post submissions handled (label: outcome)"
    );
    describe_histogram!(
        POST_CREATE_DURATION,
        "Time spent creating a post in the store"
    );
    describe_counter!(
        META_FETCH_TOTAL,
        "Link metadata fetches (label: outcome)"
    );
    describe_counter!(
        META_CACHE_HITS_TOTAL,
        "Link metadata lookups served from cache"
    );
}

/// Count a handled submission.
#[inline]
pub fn record_submission(outcome: &'static str) {
    metrics::counter!(SUBMISSIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Record how long the post store took.
#[inline]
pub fn record_post_create(elapsed: Duration) {
    metrics::histogram!(POST_CREATE_DURATION).record(elapsed.as_secs_f64());
}

/// Count a metadata fetch.
#[inline]
pub fn record_meta_fetch(outcome: &'static str) {
    metrics::counter!(META_FETCH_TOTAL, "outcome" => outcome).increment(1);
}

/// Count a metadata cache hit.
#[inline]
pub fn record_meta_cache_hit() {
    metrics::counter!(META_CACHE_HITS_TOTAL).increment(1);
}
