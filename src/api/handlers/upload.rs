//! CSV upload: parse, aggregate, record

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header::CONTENT_TYPE, StatusCode};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use super::ApiState;
use crate::aggregation::aggregate;
use crate::api::auth::Authenticated;
use crate::api::error::ApiError;
use crate::api::extract::ApiQuery;
use crate::api::models::UploadResponse;
use crate::ingest;
use crate::report::ChartSummary;
use crate::types::{upload::checksum, NewUpload};

/// Filename used when the client does not send one.
pub const DEFAULT_FILENAME: &str = "upload.csv";

/// Multipart part carrying the file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Default, Deserialize)]
pub struct UploadQuery {
    /// Filename for raw-body uploads.
    pub filename: Option<String>,
}

/// POST /upload
///
/// Accepts `multipart/form-data` with a `file` part, or the raw CSV as the
/// request body (name taken from `?filename=`).
pub async fn upload(
    State(state): State<ApiState>,
    auth: Authenticated,
    ApiQuery(query): ApiQuery<UploadQuery>,
    request: Request,
) -> Result<Json<UploadResponse>, ApiError> {
    let (filename, body) = read_upload(&state, query, request).await?;
    let response = process_upload(&state, &filename, &body)?;
    info!(
        id = response.id,
        filename = %response.filename,
        user = %auth.username,
        rows = response.summary.total_count,
        row_errors = response.row_errors.len(),
        "Upload processed"
    );
    Ok(Json(response))
}

/// Validate, summarize and record one upload.
pub fn process_upload(
    state: &ApiState,
    filename: &str,
    body: &[u8],
) -> Result<UploadResponse, ApiError> {
    let parsed = ingest::parse_reader(body)?;
    let summary = aggregate(&parsed.rows);

    let record = state.history.insert(NewUpload {
        filename: sanitize_filename(filename),
        row_count: parsed.rows.len(),
        error_count: parsed.errors.len(),
        checksum: checksum(body),
        summary,
    })?;

    Ok(UploadResponse {
        id: record.id,
        filename: record.filename,
        uploaded_at: record.uploaded_at,
        summary: ChartSummary::from_summary(&record.summary, state.precision),
        row_errors: parsed.errors,
    })
}

async fn read_upload(
    state: &ApiState,
    query: UploadQuery,
    request: Request,
) -> Result<(String, Bytes), ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if !is_multipart {
        let body = Bytes::from_request(request, state)
            .await
            .map_err(|e| body_error(state, e.status(), e.body_text()))?;
        let filename = query
            .filename
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
        return Ok((filename, body));
    }

    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| ApiError::InvalidUpload(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| body_error(state, e.status(), e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .or(query.filename)
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
        let body = field
            .bytes()
            .await
            .map_err(|e| body_error(state, e.status(), e.body_text()))?;
        return Ok((filename, body));
    }

    Err(ApiError::InvalidUpload(format!(
        "multipart body has no '{FILE_FIELD}' part"
    )))
}

/// Only length-limit failures become 413; anything else is a bad upload.
fn body_error(state: &ApiState, status: StatusCode, text: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge {
            limit: state.max_upload_bytes,
        }
    } else {
        ApiError::InvalidUpload(text)
    }
}

/// Keep only the final path component of a client-supplied name.
pub fn sanitize_filename(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() {
        DEFAULT_FILENAME.to_string()
    } else {
        name.to_string()
    }
}
