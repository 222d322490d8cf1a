//! Route definitions for the send service.
//!
//! ## Routes
//!
//! - `GET /` - Redirect to the send page
//! - `GET /health` - Health check (JSON)
//! - `GET /send` - Submission form, optionally pre-filled with `?url=`
//! - `POST /send` - Create a post from the submitted form

mod health;
mod send;

use axum::Router;
use axum::response::Redirect;
use axum::routing::get;

use crate::state::AppState;

/// Build the complete send service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/send") }))
        .route("/health", get(health::health_check))
        .route("/send", get(send::send_page).post(send::submit_post))
        .with_state(state)
}
