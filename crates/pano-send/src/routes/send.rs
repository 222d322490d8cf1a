//! The `/send` page and its submission handler.

use std::time::Instant;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use maud::Markup;
use pano_core::metrics::{record_post_create, record_submission};
use pano_core::validate::is_valid_url;
use pano_core::{FormState, NewPost, Post, SubmissionInput, UserId};
use serde::Deserialize;

use crate::error::SendError;
use crate::meta_client;
use crate::render::components::content_security_policy;
use crate::render::{FormValues, render_send_page};
use crate::session::RequireUser;
use crate::state::AppState;

/// Query parameters of `GET /send`.
#[derive(Debug, Default, Deserialize)]
pub struct SendQuery {
    /// Link to pre-fill the form with.
    #[serde(default)]
    pub url: Option<String>,
}

/// Render the submission form.
///
/// With `?url=`, the link's metadata is looked up server-side and used as
/// the default title and content.
pub async fn send_page(State(state): State<AppState>, Query(query): Query<SendQuery>) -> Response {
    let url = query.url.as_deref().map(str::trim).unwrap_or_default();

    let mut form = FormState::default();
    if is_valid_url(url) {
        match meta_client::lookup(&state, url).await {
            Ok(meta) => form.meta = Some(meta),
            Err(err) => form.error = Some(err.user_message()),
        }
    }

    let values = FormValues::prefilled(url, &form);
    let markup = render_send_page(&values, &form, &state.config);
    build_response(StatusCode::OK, markup, &state)
}

/// Handle a form submission.
///
/// On success the client is redirected (303) to the new post. Failures are
/// answered with the `{ error: { message } }` envelope, or with the form
/// re-rendered around the message when the client prefers HTML.
///
/// The body is read as raw pairs; a repeated field keeps its first value.
pub async fn submit_post(
    State(state): State<AppState>,
    RequireUser(author): RequireUser,
    headers: HeaderMap,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Response {
    let input: SubmissionInput = match form {
        Ok(Form(pairs)) => pairs.into_iter().collect(),
        Err(rejection) => {
            let err = anyhow::Error::new(rejection).context("unreadable form body");
            return error_response(&state, &headers, &SubmissionInput::default(), err.into());
        }
    };

    match create_post(&state, &input, author).await {
        Ok(post) => Redirect::to(&post.permalink()).into_response(),
        Err(err) => error_response(&state, &headers, &input, err),
    }
}

/// Answer a failed submission as JSON, or as the re-rendered form for HTML
/// clients.
fn error_response(
    state: &AppState,
    headers: &HeaderMap,
    input: &SubmissionInput,
    err: SendError,
) -> Response {
    if !prefers_html(headers) {
        return err.into_response();
    }

    err.log();
    let (status, message) = err.status_and_message();
    let form = FormState {
        error: Some(message),
        ..FormState::default()
    };
    let markup = render_send_page(&FormValues::submitted(input), &form, &state.config);
    build_response(status, markup, state)
}

/// Validate the submission and persist it.
async fn create_post(
    state: &AppState,
    input: &SubmissionInput,
    author: UserId,
) -> Result<Post, SendError> {
    let submission = input.validate().inspect_err(|err| {
        record_submission(err.code());
        tracing::info!(author = %author, reason = err.code(), "submission rejected");
    })?;

    let started = Instant::now();
    let result = state
        .posts
        .create_post(NewPost::from_submission(submission, author))
        .await;
    record_post_create(started.elapsed());

    let post = result.inspect_err(|_| record_submission("store_error"))?;
    record_submission("created");

    tracing::info!(
        post_id = %post.id,
        slug = %post.slug,
        author = %post.author_id,
        has_url = post.url.is_some(),
        "post created"
    );

    Ok(post)
}

/// Whether the `Accept` header ranks `text/html` ahead of JSON.
///
/// Compares q-values; `q=0` means not acceptable. Equal weights go to
/// whichever type is listed first.
fn prefers_html(headers: &HeaderMap) -> bool {
    let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
        return false;
    };

    let Some((html_q, html_pos)) =
        media_quality(accept, "text/html").filter(|(q, _)| *q > 0.0)
    else {
        return false;
    };

    match media_quality(accept, "application/json") {
        Some((json_q, json_pos)) => html_q > json_q || (html_q == json_q && html_pos < json_pos),
        None => true,
    }
}

/// Quality and list position of `media` in an `Accept` header.
fn media_quality(accept: &str, media: &str) -> Option<(f32, usize)> {
    accept.split(',').enumerate().find_map(|(pos, entry)| {
        let mut params = entry.split(';');
        let media_type = params.next()?.trim();
        if !media_type.eq_ignore_ascii_case(media) {
            return None;
        }
        let quality = params
            .filter_map(|p| p.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);
        Some((quality, pos))
    })
}

/// Build an HTML response with security headers.
fn build_response(status: StatusCode, markup: Markup, state: &AppState) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    // Security headers
    let csp = content_security_policy(&state.config.meta_endpoint);
    if let Ok(val) = HeaderValue::from_str(&csp) {
        headers.insert(header::CONTENT_SECURITY_POLICY, val);
    }
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    // The form is per-user; never cache it.
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));

    (status, headers, markup.into_string()).into_response()
}
