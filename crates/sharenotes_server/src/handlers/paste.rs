//! Paste HTTP handlers.

use crate::{
    error::HttpError,
    schema::{CreatePasteRequest, PasteResponse, PasteWithContent},
    AppError, AppState, StoredPaste,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sharenotes_core::{
    base62,
    constants::{
        DEFAULT_CONTENT_TYPE, MAX_EXPIRES_IN_SECONDS, MIN_CONTENT_BYTES, MIN_EXPIRES_IN_SECONDS,
    },
};

const NO_STORE: HeaderValue = HeaderValue::from_static("no-store");

/// Check content bounds and resolve the TTL to apply.
fn validate_create(
    request: &CreatePasteRequest,
    max_content_bytes: usize,
) -> Result<u32, AppError> {
    let size = request.content.len();
    if size < MIN_CONTENT_BYTES {
        return Err(AppError::Validation(
            "content must not be empty".to_string(),
        ));
    }
    if size > max_content_bytes {
        return Err(AppError::Validation(format!(
            "content is {} bytes; the limit is {} bytes",
            size, max_content_bytes
        )));
    }

    let ttl = request.expires_in_seconds;
    if !(MIN_EXPIRES_IN_SECONDS..=MAX_EXPIRES_IN_SECONDS).contains(&ttl) {
        return Err(AppError::Validation(format!(
            "expires_in_seconds must be between {} and {}",
            MIN_EXPIRES_IN_SECONDS, MAX_EXPIRES_IN_SECONDS
        )));
    }
    u32::try_from(ttl)
        .map_err(|_| AppError::Validation("expires_in_seconds is out of range".to_string()))
}

/// Resolve a live paste, treating malformed tokens as absent.
fn lookup(state: &AppState, token: &str) -> Result<StoredPaste, AppError> {
    if !base62::is_well_formed(token) {
        return Err(AppError::NotFound);
    }
    state.storage.get(token)?.ok_or(AppError::NotFound)
}

fn etag_value(paste: &StoredPaste) -> Option<HeaderValue> {
    HeaderValue::from_str(&paste.etag()).ok()
}

/// Whether an `If-None-Match` header already names `etag`.
fn if_none_match_hits(headers: &HeaderMap, etag: &str) -> bool {
    headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .any(|candidate| {
            candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
        })
}

/// Create a new paste.
///
/// # Returns
/// `201 Created` with the paste metadata.
///
/// # Errors
/// Returns `422` for malformed bodies or out-of-range content/TTL.
pub async fn create_paste(
    State(state): State<AppState>,
    payload: Result<Json<CreatePasteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PasteResponse>), HttpError> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let ttl = validate_create(&request, state.config.max_content_bytes)?;

    let paste = state
        .storage
        .create(request.content, ttl, DEFAULT_CONTENT_TYPE)?;
    tracing::info!(
        "Created paste {} ({} bytes, expires {})",
        paste.token,
        paste.size_bytes,
        paste.expires_at
    );
    Ok((StatusCode::CREATED, Json(PasteResponse::from(&paste))))
}

/// Fetch paste metadata and content.
///
/// # Errors
/// Returns `404` when the token is malformed, unknown, or expired.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, HttpError> {
    let paste = lookup(&state, &token)?;
    let etag = etag_value(&paste);
    let mut response = Json(PasteWithContent::from(paste)).into_response();
    if let Some(etag) = etag {
        response.headers_mut().insert(header::ETAG, etag);
    }
    Ok(response)
}

/// Serve the raw paste body.
///
/// Responses carry the content digest as `ETag` and are never cached;
/// a matching `If-None-Match` short-circuits to `304 Not Modified`.
///
/// # Errors
/// Returns `404` when the token is malformed, unknown, or expired.
pub async fn get_paste_content(
    State(state): State<AppState>,
    Path(token): Path<String>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let paste = lookup(&state, &token)?;
    let etag = paste.etag();
    let etag_header = etag_value(&paste);

    let mut response = if if_none_match_hits(&headers, &etag) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        let content_type = HeaderValue::from_str(&paste.content_type)
            .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        ([(header::CONTENT_TYPE, content_type)], paste.content).into_response()
    };

    let response_headers = response.headers_mut();
    response_headers.insert(header::CACHE_CONTROL, NO_STORE);
    if let Some(etag) = etag_header {
        response_headers.insert(header::ETAG, etag);
    }
    Ok(response)
}
