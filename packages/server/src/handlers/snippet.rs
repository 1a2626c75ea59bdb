use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::instrument;

use common::record::NewSnippet;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::snippet::{RecordListResponse, UploadResponse};
use crate::state::AppState;

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(8 * 1024 * 1024) // 8 MB
}

#[utoipa::path(
    post,
    path = "/api/v1/upload",
    tag = "Snippets",
    operation_id = "uploadSnippet",
    summary = "Upload a code snippet",
    description = "Reserves a quota slot, validates the snippet against it and persists the \
        snippet with a derived preview listing. A rejected upload releases its reserved slot \
        before the error is returned.",
    request_body = NewSnippet,
    responses(
        (status = 201, description = "Snippet stored", body = UploadResponse),
        (status = 400, description = "Validation rejection (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, snippet), fields(user_id = %auth_user.user_id))]
pub async fn upload_snippet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(snippet): AppJson<NewSnippet>,
) -> Result<impl IntoResponse, AppError> {
    let uid = state.uploads.upload(&auth_user.user_id, snippet).await?;
    Ok((StatusCode::CREATED, Json(UploadResponse { uid })))
}

#[utoipa::path(
    get,
    path = "/api/v1/download/{uid}",
    tag = "Snippets",
    operation_id = "downloadSnippet",
    summary = "Download a snippet's full content",
    description = "Returns the complete uploaded content as an attachment named after the \
        original filename.",
    params(("uid" = String, Path, description = "Snippet id")),
    responses(
        (status = 200, description = "Full snippet content"),
        (status = 404, description = "Unknown snippet id (NOT_FOUND)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download_snippet(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Response, AppError> {
    let full = state
        .records
        .load_full(&uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Snippet not found".into()))?;

    let content_type = mime_guess::from_path(&full.listing.filename)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "text/plain; charset=utf-8".to_string());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&full.listing.filename),
        )
        .body(Body::from(full.full_content))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/v1/records",
    tag = "Snippets",
    operation_id = "listRecords",
    summary = "List the caller's snippets",
    description = "Returns the caller's listing records (preview content only), oldest first.",
    responses(
        (status = 200, description = "Listing records", body = RecordListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Store unavailable (STORE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_records(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<RecordListResponse>, AppError> {
    let records = state.records.list_for_user(&auth_user.user_id).await?;
    let total = records.len() as u64;
    Ok(Json(RecordListResponse { records, total }))
}

/// Build a safe `Content-Disposition` header value for the download.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
