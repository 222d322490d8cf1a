//! Liveness plus a little about what the process is serving with.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    status: &'static str,
    version: &'static str,
    /// False when no session token is configured, so every submission
    /// bounces to the login page.
    accepting_submissions: bool,
    meta_cache_entries: u64,
}

/// `degraded` while submissions cannot succeed; the process is still up.
pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    let accepting_submissions = !state.config.session_tokens.is_empty();
    Json(Health {
        status: if accepting_submissions { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        accepting_submissions,
        meta_cache_entries: state.meta_cache.entry_count(),
    })
}
