//! Session login

use axum::extract::State;
use axum::Json;
use tracing::info;

use super::ApiState;
use crate::api::error::ApiError;
use crate::api::extract::ApiJson;
use crate::api::models::{LoginRequest, LoginResponse};

/// POST /login
///
/// Exchanges the configured credentials for a session token usable as
/// `Authorization: Token <token>`.
pub async fn login(
    State(state): State<ApiState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state
        .auth
        .login(&request.username, &request.password)
        .ok_or_else(|| ApiError::Auth("invalid username or password".to_string()))?;
    info!(username = %request.username, "Session token issued");
    Ok(Json(LoginResponse { token }))
}
