//! Error types for the send route.
//!
//! The submission endpoint answers script clients with JSON, so errors are
//! rendered as `{ "error": { "message": ... } }` envelopes. Validation
//! failures keep status 200 so the form can show the message inline.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pano_core::{ErrorEnvelope, StoreError, ValidationError};

/// Shown when the post store fails. The underlying error is only logged.
pub const STORE_FAILURE_MESSAGE: &str =
    "Gönderi şu anda kaydedilemedi. Lütfen daha sonra tekrar deneyin.";

/// Shown for any other unexpected failure.
pub const INTERNAL_FAILURE_MESSAGE: &str = "Beklenmeyen bir hata oluştu.";

/// Send route error type.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    /// The submitted form did not pass validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The post store failed.
    #[error("post store error: {0}")]
    Store(#[from] StoreError),

    /// Anything else, such as a request body that is not a readable form.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl SendError {
    /// Status code and the message safe to show to the user.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Validation(err) => (StatusCode::OK, err.to_string()),
            Self::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                STORE_FAILURE_MESSAGE.to_string(),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                INTERNAL_FAILURE_MESSAGE.to_string(),
            ),
        }
    }

    /// Log server-side failures. Validation failures are routine.
    pub fn log(&self) {
        match self {
            Self::Validation(_) => {}
            Self::Store(err) => tracing::error!(error = %err, "post store error"),
            Self::Internal(err) => tracing::error!(error = %err, "internal server error"),
        }
    }
}

impl IntoResponse for SendError {
    fn into_response(self) -> Response {
        self.log();
        let (status, message) = self.status_and_message();
        (status, Json(ErrorEnvelope::new(message))).into_response()
    }
}
