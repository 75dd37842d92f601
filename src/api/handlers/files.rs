//! Upload history endpoints

use axum::extract::State;
use axum::Json;

use super::ApiState;
use crate::api::auth::Authenticated;
use crate::api::error::ApiError;
use crate::api::extract::ApiPath;
use crate::api::models::{FileDetail, FileEntry};

/// GET /files
///
/// Retained uploads, newest first.
pub async fn list_files(State(state): State<ApiState>, _auth: Authenticated) -> Json<Vec<FileEntry>> {
    Json(state.history.list().iter().map(FileEntry::from).collect())
}

/// GET /files/{id}
///
/// Record metadata plus its chart summary.
pub async fn get_file(
    State(state): State<ApiState>,
    _auth: Authenticated,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<FileDetail>, ApiError> {
    let record = state.history.get(id)?;
    Ok(Json(FileDetail::from_record(&record, state.precision)))
}
