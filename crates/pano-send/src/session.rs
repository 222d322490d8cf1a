//! Session resolution for the submission handler.
//!
//! A user is identified by a session token, sent either as
//! `Authorization: Bearer <token>` or in the `pano_session` cookie. Tokens
//! are looked up in the map configured through `PANO_SESSION_TOKENS`.
//! Requests without a valid session are redirected to the login page with
//! a `redirectTo` parameter pointing back at the requested path.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use pano_core::UserId;

use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "pano_session";

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireUser(pub UserId);

/// Rejection for [`RequireUser`]: a redirect to the login page.
#[derive(Debug)]
pub struct LoginRedirect {
    redirect_to: String,
}

impl LoginRedirect {
    /// Login URL carrying `redirect_to` as the `redirectTo` parameter.
    pub fn location(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("redirectTo", &self.redirect_to)
            .finish();
        format!("{LOGIN_PATH}?{query}")
    }
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&self.location()).into_response()
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = session_token(&parts.headers)
            .and_then(|token| state.config.session_tokens.get(token))
            .cloned();

        match user {
            Some(user) => Ok(Self(user)),
            None => {
                tracing::debug!(path = %parts.uri.path(), "no valid session");
                Err(LoginRedirect {
                    redirect_to: parts.uri.path().to_string(),
                })
            }
        }
    }
}

/// Session token from the bearer header, falling back to the cookie.
fn session_token(headers: &HeaderMap) -> Option<&str> {
    bearer_token(headers).or_else(|| session_cookie(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|token| !token.is_empty())
}
